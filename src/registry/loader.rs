//! Project name extraction from the deploy tool's configuration file.
//!
//! Only lines declaring `projects["<name>"]` are recognised; everything else
//! in the file belongs to the deploy tool and is ignored here.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// `projects["<name>"]` followed by anything up to end of line.
/// Names are letters and underscores only.
static PROJECT_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)projects\["([a-z_]*)"\](.*)"#).expect("static regex"));

/// Error type for loading the project list.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read projects file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Extract declared project names, in file order.
///
/// Duplicates are kept: a name declared twice appears twice.
pub fn load_projects(config_text: &str) -> Vec<String> {
    PROJECT_DECLARATION
        .captures_iter(config_text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Read `path` and extract project names from it.
pub fn load_projects_file(path: &Path) -> Result<Vec<String>, RegistryError> {
    let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(load_projects(&content))
}
