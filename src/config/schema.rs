//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file.
//! Every section has defaults, so an empty file reproduces the stock
//! behaviour: port 4978, `../brad.conf`, `../brad -y <project> <env>`.

use serde::{Deserialize, Serialize};

use crate::dispatch::DEFAULT_ENVIRONMENTS;
use crate::security::allowlist::{BITBUCKET_RANGES, GITHUB_RANGES, LOCALHOST_ADDRESSES};

/// Root configuration for the hook service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HookConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where project names are read from.
    pub projects: ProjectsConfig,

    /// Source addresses allowed to trigger deployments.
    pub allowlist: AllowlistConfig,

    /// Deploy command settings.
    pub deploy: DeployConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4978").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4978".to_string(),
        }
    }
}

/// Project registry source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectsConfig {
    /// Deploy tool configuration scanned for `projects["<name>"]` entries.
    pub config_path: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            config_path: "../brad.conf".to_string(),
        }
    }
}

/// Allowed trigger sources.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Addresses compared verbatim (loopback forms).
    pub exact: Vec<String>,

    /// IPv4 CIDR ranges (e.g., "131.103.20.160/27").
    pub ranges: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            exact: LOCALHOST_ADDRESSES.iter().map(|s| s.to_string()).collect(),
            ranges: BITBUCKET_RANGES
                .iter()
                .chain(GITHUB_RANGES.iter())
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Deploy command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Path to the deploy executable.
    pub program: String,

    /// Arguments placed before project and environment.
    pub flags: Vec<String>,

    /// Environments a trigger may target.
    pub environments: Vec<String>,

    /// Kill the deploy command after this many seconds (0 = never).
    pub timeout_secs: u64,

    /// Run identical (project, environment) triggers one at a time.
    pub serialize_targets: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            program: "../brad".to_string(),
            flags: vec!["-y".to_string()],
            environments: DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 0,
            serialize_targets: false,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter used when RUST_LOG is unset.
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
