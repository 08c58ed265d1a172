//! Deployment progress tracking for launched chains

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::{error, info, Instrument};

use crate::error::Result;
use crate::spans;

/// Stages of a chain deployment, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStage {
    Validation,
    Subnet,
    Validators,
    Genesis,
    Network,
}

impl DeploymentStage {
    pub const ALL: [DeploymentStage; 5] = [
        DeploymentStage::Validation,
        DeploymentStage::Subnet,
        DeploymentStage::Validators,
        DeploymentStage::Genesis,
        DeploymentStage::Network,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Subnet => "subnet",
            Self::Validators => "validators",
            Self::Genesis => "genesis",
            Self::Network => "network",
        }
    }

    /// Progress message shown while the stage has not failed.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Validating configuration",
            Self::Subnet => "Creating subnet",
            Self::Validators => "Configuring validators",
            Self::Genesis => "Generating genesis block",
            Self::Network => "Starting network",
        }
    }
}

impl fmt::Display for DeploymentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentStep {
    pub stage: DeploymentStage,
    pub status: StepStatus,
    pub message: String,
}

impl DeploymentStep {
    fn pending(stage: DeploymentStage) -> Self {
        Self {
            stage,
            status: StepStatus::Pending,
            message: stage.description().to_string(),
        }
    }
}

/// Performs the work behind each deployment stage.
#[async_trait]
pub trait DeploymentExecutor: Send + Sync {
    async fn execute(&self, stage: DeploymentStage, chain_id: &str) -> Result<()>;
}

/// Runs every stage in order, reporting the full step list after each change.
///
/// Stops at the first failing stage: it is marked failed with the message
/// `Error: <reason>`, later stages stay pending, and the error is returned.
pub async fn track_deployment<E, F>(
    executor: &E,
    chain_id: &str,
    mut on_progress: F,
) -> Result<Vec<DeploymentStep>>
where
    E: DeploymentExecutor + ?Sized,
    F: FnMut(&[DeploymentStep]) + Send,
{
    let span = spans::deploy_chain(chain_id);

    async move {
        let mut steps: Vec<DeploymentStep> = DeploymentStage::ALL
            .into_iter()
            .map(DeploymentStep::pending)
            .collect();

        for index in 0..steps.len() {
            let stage = steps[index].stage;
            steps[index].status = StepStatus::InProgress;
            on_progress(&steps);

            match executor.execute(stage, chain_id).await {
                Ok(()) => {
                    steps[index].status = StepStatus::Completed;
                    on_progress(&steps);
                    info!(stage = %stage, event = "deployment_stage_completed");
                }
                Err(e) => {
                    steps[index].status = StepStatus::Failed;
                    steps[index].message = format!("Error: {e}");
                    on_progress(&steps);
                    spans::record_error_with_context(
                        "DeploymentFailed",
                        &e.to_string(),
                        Some(&format!("Stage {stage}")),
                    );
                    error!(stage = %stage, error = %e, event = "deployment_stage_failed");
                    return Err(e);
                }
            }
        }

        info!(chain_id = chain_id, event = "deployment_completed");
        Ok(steps)
    }
    .instrument(span)
    .await
}
