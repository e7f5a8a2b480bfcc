//! External process execution.
//!
//! The dispatcher only sees the [`Executor`] trait, so tests can swap in a
//! recording fake instead of spawning processes.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit status was zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Reasons a process produced no exit status at all.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} timed out after {secs} seconds")]
    Timeout { program: String, secs: u64 },
}

/// Capability to run an external program.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, program: &str, args: &[String]) -> Result<ExecOutput, ExecError>;
}

/// Runs programs as child processes on the tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and fail if it runs longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Build from a seconds value where 0 means "no timeout".
    pub fn from_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::new()
        } else {
            Self::with_timeout(Duration::from_secs(secs))
        }
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<ExecOutput, ExecError> {
        let spawn_err = |source| ExecError::Spawn {
            program: program.to_string(),
            source,
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The wait is only dropped early when the timeout expires.
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExecError::Timeout {
                    program: program.to_string(),
                    secs: limit.as_secs(),
                })?
                .map_err(spawn_err)?,
            None => child.wait_with_output().await.map_err(spawn_err)?,
        };

        Ok(ExecOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
