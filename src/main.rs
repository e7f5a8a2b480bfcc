//! brad-hook: deployment webhook receiver.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!   Webhook (Bitbucket,  │                  BRAD HOOK                     │
//!   GitHub, localhost)   │                                               │
//!   ─────────────────────┼─▶ http ──▶ client_ip ──▶ allowlist (cidr)     │
//!                        │                              │ 403            │
//!                        │                              ▼                │
//!                        │                      registry + env check     │
//!                        │                              │ 404            │
//!                        │                              ▼                │
//!   ◀────────────────────┼── "OK"+stdout ◀──── deploy command ───────────┼──▶ ../brad -y <p> <e>
//!                        │                                               │
//!                        │   config · observability · lifecycle          │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use brad_hook::config::{load_config, HookConfig};
use brad_hook::lifecycle::{self, signals, Shutdown};
use brad_hook::observability::logging;

#[derive(Parser)]
#[command(name = "brad-hook")]
#[command(about = "Webhook receiver that triggers brad deployments", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:4978).
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the brad configuration file scanned for projects.
    #[arg(short, long)]
    projects: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HookConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(projects) = cli.projects {
        config.projects.config_path = projects.to_string_lossy().to_string();
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("brad-hook v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        projects_file = %config.projects.config_path,
        deploy_program = %config.deploy.program,
        "Configuration loaded"
    );

    let started = lifecycle::start(config).await?;
    tracing::info!(
        address = %started.listener.local_addr()?,
        "Listening for triggers"
    );

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    started.server.run(started.listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
