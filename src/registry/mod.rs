//! Project registry.
//!
//! # Data Flow
//! ```text
//! brad.conf (deploy tool config)
//!     → loader.rs (scan for projects["<name>"] declarations)
//!     → ProjectRegistry (immutable, insertion-ordered)
//!     → shared via Arc with the dispatcher and the /hooks listing
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup; the file is never watched or re-read
//! - An unreadable file is a fatal startup error

pub mod loader;

use std::path::Path;

use serde::Serialize;

pub use loader::{load_projects, load_projects_file, RegistryError};

/// The set of project names that may be deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProjectRegistry {
    names: Vec<String>,
}

impl ProjectRegistry {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse declarations out of configuration text.
    pub fn from_config_text(text: &str) -> Self {
        Self::new(load_projects(text))
    }

    /// Load from the deploy tool's configuration file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let names = load_projects_file(path)?;
        tracing::info!(path = ?path, projects = names.len(), "Project registry loaded");
        Ok(Self::new(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in declaration order, duplicates included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
