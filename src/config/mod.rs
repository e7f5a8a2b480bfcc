//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HookConfig (validated, immutable)
//!     → consumed once at startup to build the dispatcher and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The deploy tool's own config (brad.conf) is not parsed here; see `registry`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AllowlistConfig, DeployConfig, HookConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ProjectsConfig, SecurityConfig,
};
