//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the hook routes
//! - Wire up middleware (tracing, request ID, body limit)
//! - Bind server to listener
//! - Serve until the shutdown signal fires, draining in-flight triggers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::HookConfig;
use crate::dispatch::Dispatcher;
use crate::http::handlers::{list_hooks, trigger_hook, trigger_hook_query};
use crate::lifecycle::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server exposing the hook routes.
pub struct HttpServer {
    router: Router,
    config: HookConfig,
}

impl HttpServer {
    /// Create a new HTTP server around a ready dispatcher.
    pub fn new(config: HookConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState { dispatcher };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &HookConfig, state: AppState) -> Router {
        Router::new()
            .route("/hooks", get(list_hooks))
            .route("/hook/{name}/{env}", post(trigger_hook))
            .route("/hook", get(trigger_hook_query).post(trigger_hook_query))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HookConfig {
        &self.config
    }
}
