use std::error::Error;

use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "hook-cli")]
#[command(about = "Client for a running brad-hook service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4978")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects that can be deployed
    List,
    /// Trigger a deployment of a project to an environment
    Trigger {
        /// Project name as declared in brad.conf
        name: String,
        /// Target environment (prod or beta by default)
        env: String,
    },
}

/// Append `segments` to the service URL, percent-encoding each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a service URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.as_str();

    match cli.command {
        Commands::List => {
            let res = client.get(endpoint(base, &["hooks"])?).send().await?;
            if !res.status().is_success() {
                eprintln!("Error: hook service returned status {}", res.status());
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Trigger { name, env } => {
            let res = client
                .post(endpoint(base, &["hook", &name, &env])?)
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            if status.is_success() {
                println!("{}", body);
            } else {
                eprintln!("Error: {} {}", status, body);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
