use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "grid-cli")]
#[command(about = "Client CLI for the grid gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check liveness and readiness
    Status,
    /// Show service config and grid client info
    Config,
    /// Change service name and/or state
    SetConfig {
        #[arg(long)]
        service_name: Option<String>,
        /// Unknown, NotAvailable or Available
        #[arg(long)]
        state: Option<String>,
    },
    /// Read one entry
    Get { name: String, key: String },
    /// Write one entry; VALUE is parsed as JSON, or taken as a string
    Put { name: String, key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            for probe in ["health", "readiness"] {
                let res = client.get(format!("{}/{}", base, probe)).send().await?;
                println!("{:<10} {}", probe, res.status());
            }
        }
        Commands::Config => {
            let res = client.get(format!("{}/config", base)).send().await?;
            print_response(res).await?;
        }
        Commands::SetConfig { service_name, state } => {
            let mut query = Vec::new();
            if let Some(name) = service_name {
                query.push(("serviceName", name));
            }
            if let Some(state) = state {
                query.push(("state", state));
            }
            // reqwest follows the redirect to /config
            let res = client
                .post(format!("{}/setConfig", base))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { name, key } => {
            let res = client
                .get(format!("{}/map", base))
                .query(&[("name", name), ("key", key)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Put { name, key, value } => {
            let value = parse_value(&value);
            let res = client
                .post(format!("{}/map", base))
                .query(&[("name", name), ("key", key)])
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&serde_json::json!({ "value": value }))?)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
