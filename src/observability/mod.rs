//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, deploy command, HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (trigger counters, deploy durations)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) attached to every request span
//! - Metrics are off by default

pub mod logging;
pub mod metrics;
