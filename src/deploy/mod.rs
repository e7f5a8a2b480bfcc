//! Deployment execution subsystem.
//!
//! # Data Flow
//! ```text
//! Validated trigger (project, environment)
//!     → guard.rs (optional: wait for same-target deploy to finish)
//!     → command.rs (build `<program> -y <project> <environment>`)
//!     → executor.rs (spawn child, capture stdout/stderr, optional timeout)
//!     → DeployOutcome { succeeded, output }
//! ```
//!
//! # Design Decisions
//! - Exactly one invocation per trigger, never retried
//! - The child runs on the async runtime and never blocks other requests
//! - The dispatcher runs each deploy on its own task, so a disconnected
//!   caller never cancels a deploy
//! - No timeout unless configured

pub mod command;
pub mod executor;
pub mod guard;

pub use command::{DeployCommand, DeployOutcome};
pub use executor::{ExecError, ExecOutput, Executor, ProcessExecutor};
pub use guard::TargetLocks;
