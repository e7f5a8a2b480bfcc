//! Deploy command invocation: `<program> <flags...> <project> <environment>`.

use std::time::Instant;

use crate::config::DeployConfig;
use crate::deploy::executor::Executor;
use crate::observability::metrics;

/// Result of one deploy command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub succeeded: bool,
    /// Captured standard output.
    pub output: String,
}

/// The external deploy tool and the flags passed before the target.
#[derive(Debug, Clone)]
pub struct DeployCommand {
    program: String,
    flags: Vec<String>,
}

impl DeployCommand {
    pub fn new(program: impl Into<String>, flags: Vec<String>) -> Self {
        Self {
            program: program.into(),
            flags,
        }
    }

    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(config.program.clone(), config.flags.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a target.
    pub fn args(&self, project: &str, environment: &str) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push(project.to_string());
        args.push(environment.to_string());
        args
    }

    /// Run the command once for `project`/`environment`.
    ///
    /// Execution errors and non-zero exits are both reported as failures;
    /// their detail is logged and not returned.
    pub async fn run(&self, executor: &dyn Executor, project: &str, environment: &str) -> DeployOutcome {
        let start = Instant::now();
        let args = self.args(project, environment);

        tracing::info!(
            program = %self.program,
            project = %project,
            environment = %environment,
            "Deploying"
        );

        let outcome = match executor.execute(&self.program, &args).await {
            Ok(out) if out.success => {
                tracing::info!(
                    project = %project,
                    environment = %environment,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Deploy finished"
                );
                tracing::debug!(stdout = %out.stdout, "Deploy output");
                DeployOutcome {
                    succeeded: true,
                    output: out.stdout,
                }
            }
            Ok(out) => {
                tracing::warn!(
                    project = %project,
                    environment = %environment,
                    exit_code = ?out.exit_code,
                    stderr = %out.stderr,
                    "Deploy command failed"
                );
                DeployOutcome {
                    succeeded: false,
                    output: out.stdout,
                }
            }
            Err(e) => {
                tracing::error!(
                    project = %project,
                    environment = %environment,
                    error = %e,
                    "Deploy command could not run"
                );
                DeployOutcome {
                    succeeded: false,
                    output: String::new(),
                }
            }
        };

        metrics::record_deploy(project, environment, outcome.succeeded, start);
        outcome
    }
}
