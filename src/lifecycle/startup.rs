//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the project registry (fatal if unreadable)
//! - Build the allowlist, deploy command and dispatcher
//! - Start the optional metrics endpoint (fatal if it cannot start)
//! - Bind the listener last, so traffic only arrives when ready

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::HookConfig;
use crate::deploy::{Executor, ProcessExecutor};
use crate::dispatch::Dispatcher;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::registry::{ProjectRegistry, RegistryError};
use crate::security::CidrParseError;

/// Fatal startup failures; the process does not serve traffic.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load projects: {0}")]
    Registry(#[from] RegistryError),
    #[error("invalid allowlist: {0}")]
    Allowlist(#[from] CidrParseError),
    #[error("failed to start metrics endpoint on {address}: {reason}")]
    Metrics { address: String, reason: String },
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server ready to run, and the socket it will serve.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Build the dispatcher for `config` around an already-loaded registry.
pub fn build_dispatcher(
    config: &HookConfig,
    registry: ProjectRegistry,
    executor: Arc<dyn Executor>,
) -> Result<Dispatcher, StartupError> {
    Ok(Dispatcher::from_config(config, Arc::new(registry), executor)?)
}

fn start_metrics(address: &str) -> Result<(), StartupError> {
    let metrics_error = |reason: String| StartupError::Metrics {
        address: address.to_string(),
        reason,
    };
    let addr: SocketAddr = address.parse().map_err(|e: AddrParseError| metrics_error(e.to_string()))?;
    metrics::init_metrics(addr).map_err(|e| metrics_error(e.to_string()))
}

/// Initialize every subsystem in order and bind the listener.
pub async fn start(config: HookConfig) -> Result<Started, StartupError> {
    let registry = ProjectRegistry::load(Path::new(&config.projects.config_path))?;
    if registry.is_empty() {
        tracing::warn!(path = %config.projects.config_path, "No projects declared; every trigger will be rejected");
    }

    let executor = Arc::new(ProcessExecutor::from_timeout_secs(config.deploy.timeout_secs));
    let dispatcher = build_dispatcher(&config, registry, executor)?;

    tracing::info!(
        program = %config.deploy.program,
        environments = ?config.deploy.environments,
        allowlist_ranges = config.allowlist.ranges.len(),
        serialize_targets = config.deploy.serialize_targets,
        "Dispatcher ready"
    );

    if config.observability.metrics_enabled {
        start_metrics(&config.observability.metrics_address)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(config, Arc::new(dispatcher));
    Ok(Started { server, listener })
}
