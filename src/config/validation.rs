//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses and CIDR ranges parse
//! - Check the deploy command has something to run and somewhere to deploy
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HookConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::HookConfig;
use crate::security::CidrRange;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &HookConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.projects.config_path.trim().is_empty() {
        errors.push(ValidationError::new("projects.config_path", "must not be empty"));
    }

    for (i, range) in config.allowlist.ranges.iter().enumerate() {
        if let Err(e) = range.parse::<CidrRange>() {
            errors.push(ValidationError::new(format!("allowlist.ranges[{}]", i), e.to_string()));
        }
    }

    if config.deploy.program.trim().is_empty() {
        errors.push(ValidationError::new("deploy.program", "must not be empty"));
    }

    if config.deploy.environments.is_empty() {
        errors.push(ValidationError::new("deploy.environments", "at least one environment is required"));
    }
    if config.deploy.environments.iter().any(|e| e.is_empty()) {
        errors.push(ValidationError::new("deploy.environments", "environment names must not be empty"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {:?}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
