//! Chain launchpad
//!
//! The three-step form describing a new chain and the tracker that reports
//! deployment progress once the launch request is submitted.

mod deployment;
mod form;

pub use deployment::{
    track_deployment, DeploymentExecutor, DeploymentStage, DeploymentStep, StepStatus,
};
pub use form::{Consensus, LaunchpadConfig, LaunchpadField, LaunchpadSchema, LaunchpadWizard};
