//! Trigger authentication, validation and deploy invocation.

use std::fmt;
use std::sync::Arc;

use crate::config::HookConfig;
use crate::deploy::{DeployCommand, DeployOutcome, Executor, TargetLocks};
use crate::observability::metrics;
use crate::registry::ProjectRegistry;
use crate::security::{Allowlist, CidrParseError};

/// Environments accepted when none are configured.
pub const DEFAULT_ENVIRONMENTS: [&str; 2] = ["prod", "beta"];

/// One inbound deployment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub project: String,
    pub environment: String,
    pub source_ip: String,
}

impl TriggerRequest {
    pub fn new(project: impl Into<String>, environment: impl Into<String>, source_ip: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            environment: environment.into(),
            source_ip: source_ip.into(),
        }
    }
}

/// Progress of a trigger through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStage {
    Received,
    IpChecked,
    ProjectChecked,
    Dispatched,
    Responded,
}

impl fmt::Display for TriggerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriggerStage::Received => "received",
            TriggerStage::IpChecked => "ip_checked",
            TriggerStage::ProjectChecked => "project_checked",
            TriggerStage::Dispatched => "dispatched",
            TriggerStage::Responded => "responded",
        };
        f.write_str(s)
    }
}

/// Terminal rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("source address {ip:?} is not allowed")]
    Unauthorized { ip: String },

    #[error("unknown project or environment: {project}/{environment}")]
    NotFound { project: String, environment: String },

    #[error("deploy of {project}/{environment} failed")]
    DeployFailed { project: String, environment: String },
}

impl DispatchError {
    /// The stage at which the trigger was rejected.
    pub fn stage(&self) -> TriggerStage {
        match self {
            DispatchError::Unauthorized { .. } => TriggerStage::Received,
            DispatchError::NotFound { .. } => TriggerStage::IpChecked,
            DispatchError::DeployFailed { .. } => TriggerStage::Dispatched,
        }
    }

    /// Label used for the trigger outcome metric.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Unauthorized { .. } => "unauthorized",
            DispatchError::NotFound { .. } => "not_found",
            DispatchError::DeployFailed { .. } => "deploy_failed",
        }
    }
}

/// Decides whether a trigger may deploy and runs the deploy command.
pub struct Dispatcher {
    allowlist: Allowlist,
    registry: Arc<ProjectRegistry>,
    environments: Vec<String>,
    command: DeployCommand,
    executor: Arc<dyn Executor>,
    target_locks: Option<Arc<TargetLocks>>,
}

impl Dispatcher {
    pub fn new(
        allowlist: Allowlist,
        registry: Arc<ProjectRegistry>,
        command: DeployCommand,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            allowlist,
            registry,
            environments: DEFAULT_ENVIRONMENTS.iter().map(|e| e.to_string()).collect(),
            command,
            executor,
            target_locks: None,
        }
    }

    /// Build from validated configuration.
    pub fn from_config(
        config: &HookConfig,
        registry: Arc<ProjectRegistry>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self, CidrParseError> {
        let allowlist = Allowlist::from_config(&config.allowlist)?;
        let command = DeployCommand::from_config(&config.deploy);

        let mut dispatcher = Self::new(allowlist, registry, command, executor)
            .with_environments(config.deploy.environments.clone());
        if config.deploy.serialize_targets {
            dispatcher = dispatcher.with_target_locks();
        }
        Ok(dispatcher)
    }

    pub fn with_environments(mut self, environments: Vec<String>) -> Self {
        self.environments = environments;
        self
    }

    /// Serialize concurrent deploys of the same (project, environment).
    pub fn with_target_locks(mut self) -> Self {
        self.target_locks = Some(Arc::new(TargetLocks::new()));
        self
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    /// Received → IpChecked.
    pub fn authorize(&self, source_ip: &str) -> Result<(), DispatchError> {
        if self.allowlist.is_allowed(source_ip) {
            Ok(())
        } else {
            Err(DispatchError::Unauthorized {
                ip: source_ip.to_string(),
            })
        }
    }

    /// IpChecked → ProjectChecked.
    pub fn validate(&self, project: &str, environment: &str) -> Result<(), DispatchError> {
        let env_ok = self.environments.iter().any(|e| e == environment);
        if env_ok && self.registry.contains(project) {
            Ok(())
        } else {
            Err(DispatchError::NotFound {
                project: project.to_string(),
                environment: environment.to_string(),
            })
        }
    }

    /// Run a trigger through every stage.
    pub async fn dispatch(&self, request: &TriggerRequest) -> Result<DeployOutcome, DispatchError> {
        let result = self.run_stages(request).await;
        match &result {
            Ok(_) => metrics::record_trigger("deployed"),
            Err(e) => {
                tracing::warn!(
                    source_ip = %request.source_ip,
                    project = %request.project,
                    environment = %request.environment,
                    stage = %e.stage(),
                    reason = %e,
                    "Trigger rejected"
                );
                metrics::record_trigger(e.kind());
            }
        }
        result
    }

    async fn run_stages(&self, request: &TriggerRequest) -> Result<DeployOutcome, DispatchError> {
        let TriggerRequest {
            project,
            environment,
            source_ip,
        } = request;

        tracing::info!(source_ip = %source_ip, project = %project, environment = %environment, "Trigger received");

        self.authorize(source_ip)?;
        tracing::debug!(stage = %TriggerStage::IpChecked, source_ip = %source_ip, "Source allowed");

        self.validate(project, environment)?;
        tracing::debug!(stage = %TriggerStage::ProjectChecked, project = %project, environment = %environment, "Target valid");

        let outcome = self.spawn_deploy(project, environment).await;
        tracing::debug!(stage = %TriggerStage::Dispatched, succeeded = outcome.succeeded, "Deploy command returned");

        if outcome.succeeded {
            Ok(outcome)
        } else {
            Err(DispatchError::DeployFailed {
                project: project.clone(),
                environment: environment.clone(),
            })
        }
    }

    /// Run the deploy on its own task and wait for it.
    ///
    /// The task owns the child process and the target guard, so a caller
    /// that stops waiting (client disconnect) only loses the response; the
    /// command still runs to completion.
    async fn spawn_deploy(&self, project: &str, environment: &str) -> DeployOutcome {
        let command = self.command.clone();
        let executor = Arc::clone(&self.executor);
        let locks = self.target_locks.clone();
        let project = project.to_string();
        let environment = environment.to_string();

        let task = tokio::spawn(async move {
            let _in_flight = match &locks {
                Some(locks) => Some(locks.acquire(&project, &environment).await),
                None => None,
            };
            command.run(executor.as_ref(), &project, &environment).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Deploy task did not complete");
                DeployOutcome {
                    succeeded: false,
                    output: String::new(),
                }
            }
        }
    }
}
