//! Integration tests for the launchpad form and deployment tracking

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use snowprint::launchpad::{
    track_deployment, Consensus, DeploymentExecutor, DeploymentStage, LaunchpadField,
    LaunchpadWizard, StepStatus,
};
use snowprint::wizard::Advance;
use snowprint::{Result, SnowprintError};

fn fill_basic_information(wizard: &mut LaunchpadWizard) {
    wizard.update_field(LaunchpadField::ChainName, "Glacier Testnet");
    wizard.update_field(LaunchpadField::Symbol, "GLCR");
    wizard.update_field(LaunchpadField::Description, "A chain for cold storage games");
}

#[test]
fn test_launchpad_walkthrough() {
    let mut wizard = LaunchpadWizard::launchpad();
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.step_count(), 3);

    wizard.update_field(LaunchpadField::ChainName, "Glacier Testnet");
    wizard.update_field(LaunchpadField::Symbol, "ab!");

    let errors = wizard.advance().unwrap_err();
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(
        errors.get(&LaunchpadField::Symbol).map(String::as_str),
        Some("Symbol must be 2-10 uppercase letters or numbers")
    );
    assert!(!errors.contains_key(&LaunchpadField::ChainName));

    wizard.update_field(LaunchpadField::Symbol, "GLCR");
    assert_eq!(wizard.advance().unwrap(), Advance::Moved(2));
    assert!(wizard.errors().is_empty());

    // defaults: pos, 2 second blocks, 4 validators
    assert_eq!(wizard.advance().unwrap(), Advance::Moved(3));

    let errors = wizard.advance().unwrap_err();
    assert_eq!(
        errors.keys().copied().collect::<Vec<_>>(),
        vec![LaunchpadField::MaxSupply, LaunchpadField::SubnetThreshold]
    );

    wizard.update_field(LaunchpadField::MaxSupply, "720000000");
    wizard.update_field(LaunchpadField::SubnetThreshold, "0.67");

    let Advance::Finalized(config) = wizard.advance().unwrap() else {
        panic!("last step should finalize");
    };
    assert_eq!(config.chain_name, "Glacier Testnet");
    assert_eq!(config.symbol, "GLCR");
    assert_eq!(config.consensus, Consensus::Pos);
    assert_eq!(config.block_time_secs, 2);
    assert_eq!(config.initial_validators, 4);
    assert_eq!(config.max_supply, "720000000");

    // the wizard starts over once the request is handed off
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.value(LaunchpadField::ChainName), "");
    assert_eq!(wizard.value(LaunchpadField::ConsensusMechanism), "pos");
}

#[test]
fn test_retreat_keeps_values() {
    let mut wizard = LaunchpadWizard::launchpad();
    wizard.retreat();
    assert_eq!(wizard.current_step(), 1);

    fill_basic_information(&mut wizard);
    wizard.advance().unwrap();
    wizard.update_field(LaunchpadField::BlockTime, "5");
    wizard.retreat();

    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.value(LaunchpadField::Symbol), "GLCR");
    assert_eq!(wizard.value(LaunchpadField::BlockTime), "5");
}

#[test]
fn test_invalid_technical_parameters() {
    let mut wizard = LaunchpadWizard::launchpad();
    fill_basic_information(&mut wizard);
    wizard.advance().unwrap();

    wizard.update_field(LaunchpadField::ConsensusMechanism, "pow");
    wizard.update_field(LaunchpadField::BlockTime, "0");
    wizard.update_field(LaunchpadField::InitialValidators, "0");

    let errors = wizard.advance().unwrap_err();
    insta::assert_debug_snapshot!(errors, @r###"
    {
        ConsensusMechanism: "Consensus mechanism must be pos or poa",
        BlockTime: "Block time must be at least 1 second",
        InitialValidators: "Must have at least 1 validator",
    }
    "###);
    assert_eq!(wizard.current_step(), 2);
}

#[test]
fn test_launch_request_json() {
    let mut wizard = LaunchpadWizard::launchpad();
    fill_basic_information(&mut wizard);
    wizard.advance().unwrap();
    wizard.update_field(LaunchpadField::ConsensusMechanism, "poa");
    wizard.advance().unwrap();
    wizard.update_field(LaunchpadField::MaxSupply, "1000000");
    wizard.update_field(LaunchpadField::SubnetThreshold, "5");

    let Advance::Finalized(config) = wizard.advance().unwrap() else {
        panic!("last step should finalize");
    };
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["chainName"], "Glacier Testnet");
    assert_eq!(json["consensusMechanism"], "poa");
    assert_eq!(json["blockTime"], 2);
    assert_eq!(json["subnetThreshold"], "5");
}

/// Executor that fails the listed stages and records every call.
#[derive(Default)]
struct ScriptedExecutor {
    failing: HashSet<DeploymentStage>,
    executed: Mutex<Vec<DeploymentStage>>,
}

#[async_trait]
impl DeploymentExecutor for ScriptedExecutor {
    async fn execute(&self, stage: DeploymentStage, _chain_id: &str) -> Result<()> {
        self.executed.lock().unwrap().push(stage);
        if self.failing.contains(&stage) {
            return Err(SnowprintError::Api("subnet quota exceeded".to_string()));
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_deployment_runs_every_stage() {
    let executor = ScriptedExecutor::default();
    let mut snapshots = 0;

    let steps = track_deployment(&executor, "glacier-testnet", |_| snapshots += 1)
        .await
        .unwrap();

    assert!(steps.iter().all(|s| s.status == StepStatus::Completed));
    assert_eq!(
        *executor.executed.lock().unwrap(),
        DeploymentStage::ALL.to_vec()
    );
    // one in-progress and one completed report per stage
    assert_eq!(snapshots, 10);
}

#[tokio::test]
async fn test_deployment_stops_at_failed_stage() {
    let executor = ScriptedExecutor {
        failing: HashSet::from([DeploymentStage::Subnet]),
        ..Default::default()
    };
    let mut last = Vec::new();

    let err = track_deployment(&executor, "glacier-testnet", |steps| last = steps.to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, SnowprintError::Api(_)));
    assert_eq!(last[0].status, StepStatus::Completed);
    assert_eq!(last[1].status, StepStatus::Failed);
    assert_eq!(
        last[1].message,
        "Error: API returned an error: subnet quota exceeded"
    );
    assert!(last[2..].iter().all(|s| s.status == StepStatus::Pending));
    assert_eq!(executor.executed.lock().unwrap().len(), 2);
}
