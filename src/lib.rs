//! Deployment webhook receiver library.

pub mod config;
pub mod deploy;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod security;

pub use config::HookConfig;
pub use dispatch::{DispatchError, Dispatcher, TriggerRequest};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::ProjectRegistry;
