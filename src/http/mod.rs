//! HTTP route layer.
//!
//! # Data Flow
//! ```text
//! TCP connection (peer address kept via ConnectInfo)
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → handlers.rs
//!         GET  /hooks               → registry listing (JSON array)
//!         POST /hook/{name}/{env}   → dispatcher
//!         GET|POST /hook?name&env   → dispatcher
//!     → response.rs (status + short text body)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
