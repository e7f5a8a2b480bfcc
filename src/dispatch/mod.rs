//! Trigger dispatch.
//!
//! # Data Flow
//! ```text
//! Received        (route layer built a TriggerRequest)
//!     → IpChecked       allowlist match, else Unauthorized (403)
//!     → ProjectChecked  env allowed AND project registered, else NotFound (404)
//!     → Dispatched      deploy command run exactly once
//!     → Responded       200 "OK" + stdout, or 404 on command failure
//! ```
//!
//! # Design Decisions
//! - Linear: no retries, no partial state kept after a rejection
//! - All shared state is read-only; dispatch holds no global lock
//! - Identical concurrent triggers run concurrently unless target locks are on

pub mod dispatcher;

pub use dispatcher::{
    DispatchError, Dispatcher, TriggerRequest, TriggerStage, DEFAULT_ENVIRONMENTS,
};
