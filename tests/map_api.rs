//! End-to-end tests for the `/map` endpoints.

use std::sync::atomic::Ordering;
use std::time::Duration;

use grid_gateway::grid::GridClient;
use grid_gateway::http::{Entry, Message, NO_MAP, NO_VALUE};
use reqwest::StatusCode;
use serde_json::json;

mod common;

const TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::test]
async fn test_get_absent_map_is_informational() {
    let app = common::start_app(TIMEOUT).await;

    let res = common::client()
        .get(format!("{}/map?name=absent&key=x", app.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Message = res.json().await.unwrap();
    assert_eq!(body.msg, NO_MAP);
}

#[tokio::test]
async fn test_get_absent_key_is_informational() {
    let app = common::start_app(TIMEOUT).await;
    app.grid
        .get_map("present")
        .await
        .unwrap()
        .put("other", json!("v"))
        .await
        .unwrap();

    let res = common::client()
        .get(format!("{}/map?name=present&key=absent", app.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Message = res.json().await.unwrap();
    assert_eq!(body.msg, NO_VALUE);
}

#[tokio::test]
async fn test_empty_string_value_reads_as_absent() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();

    let res = client
        .post(format!("{}/map?name=m&key=k", app.base_url))
        .header("Content-Type", "application/json")
        .body(r#"{"value":""}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/map?name=m&key=k", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Message = res.json().await.unwrap();
    assert_eq!(body.msg, NO_VALUE);
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();

    let res = client
        .post(format!("{}/map?name=m&key=k", app.base_url))
        .header("Content-Type", "application/json")
        .body(r#"{"value":"v1"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let confirmation: Message = res.json().await.unwrap();
    assert!(confirmation.msg.contains("k"));
    assert!(confirmation.msg.contains("v1"));
    assert!(confirmation.msg.contains("m"));

    let res = client
        .get(format!("{}/map?name=m&key=k", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let entry: Entry = res.json().await.unwrap();
    assert_eq!(
        entry,
        Entry {
            key: "k".into(),
            value: json!("v1")
        }
    );
}

#[tokio::test]
async fn test_structured_values_survive() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();

    let value = json!({"sku": "A-1", "qty": 3, "tags": ["x", "y"]});
    let res = client
        .post(format!("{}/map?name=orders&key=o1", app.base_url))
        .header("Content-Type", "application/json")
        .json(&json!({ "value": value }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let entry: Entry = client
        .get(format!("{}/map?name=orders&key=o1", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry.value, value);
}

#[tokio::test]
async fn test_wrong_content_type_rejected() {
    let app = common::start_app(TIMEOUT).await;

    let res = common::client()
        .post(format!("{}/map?name=m&key=k", app.base_url))
        .header("Content-Type", "text/plain")
        .body(r#"{"value":"v1"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.grid.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = common::start_app(TIMEOUT).await;

    for body in ["{not json", r#"{"other": 1}"#, ""] {
        let res = common::client()
            .post(format!("{}/map?name=m&key=k", app.base_url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
    }
    assert_eq!(app.grid.call_count(), 0);
}

#[tokio::test]
async fn test_missing_params_never_reach_grid() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();

    for query in ["", "?name=m", "?key=k", "?name=&key=k", "?name=a&name=b&key=k"] {
        let res = client
            .get(format!("{}/map{}", app.base_url, query))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "GET {:?}", query);

        let res = client
            .post(format!("{}/map{}", app.base_url, query))
            .header("Content-Type", "application/json")
            .body(r#"{"value":"v"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "POST {:?}", query);
    }

    assert_eq!(app.grid.call_count(), 0);
}

#[tokio::test]
async fn test_failure_sites_are_distinguishable() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();
    app.grid.get_map("m").await.unwrap();
    let url = format!("{}/map?name=m&key=k", app.base_url);

    app.grid.faults.fail_list.store(true, Ordering::SeqCst);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Message = res.json().await.unwrap();
    assert!(body.msg.starts_with("failed to list distributed objects"));
    app.grid.faults.fail_list.store(false, Ordering::SeqCst);

    app.grid.faults.fail_get_map.store(true, Ordering::SeqCst);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let map_failure: Message = res.json().await.unwrap();
    app.grid.faults.fail_get_map.store(false, Ordering::SeqCst);

    app.grid.faults.fail_get.store(true, Ordering::SeqCst);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value_failure: Message = res.json().await.unwrap();

    assert!(map_failure.msg.starts_with("failed to retrieve map"));
    assert!(value_failure.msg.starts_with("failed to retrieve value"));
}

#[tokio::test]
async fn test_put_failure_is_server_error() {
    let app = common::start_app(TIMEOUT).await;
    app.grid.faults.fail_put.store(true, Ordering::SeqCst);

    let res = common::client()
        .post(format!("{}/map?name=m&key=k", app.base_url))
        .header("Content-Type", "application/json")
        .body(r#"{"value":"v1"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Message = res.json().await.unwrap();
    assert!(body.msg.starts_with("failed to put value"));
}

#[tokio::test]
async fn test_stalled_grid_call_times_out() {
    let app = common::start_app(Duration::from_millis(200)).await;
    app.grid.get_map("m").await.unwrap();
    app.grid.faults.stall_get.store(true, Ordering::SeqCst);

    let started = std::time::Instant::now();
    let res = common::client()
        .get(format!("{}/map?name=m&key=k", app.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() < Duration::from_secs(5));
    let body: Message = res.json().await.unwrap();
    assert!(body.msg.contains("timed out"), "{}", body.msg);
}

#[tokio::test]
async fn test_existence_checked_on_every_get() {
    let app = common::start_app(TIMEOUT).await;
    let client = common::client();
    let url = format!("{}/map?name=late&key=k", app.base_url);

    let body: Message = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body.msg, NO_MAP);

    // map appears behind the gateway's back
    app.grid
        .get_map("late")
        .await
        .unwrap()
        .put("k", json!(42))
        .await
        .unwrap();

    let entry: Entry = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(entry.value, json!(42));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = common::start_app(TIMEOUT).await;

    let res = common::client()
        .get(format!("{}/map?name=absent&key=x", app.base_url))
        .send()
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = common::client()
        .get(format!("{}/health", app.base_url))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}
