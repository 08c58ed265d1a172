//! End-to-end walkthrough of the explorer client
//!
//! Loads configuration from the environment (and `.env`), probes the
//! configured Avalanche RPC endpoint, the explorer backend and the Snowtrace
//! stats API, then runs a complete approve-then-bridge submission and a chain
//! launch against in-memory fakes so no wallet or funds are needed.
//!
//! Run with: `RUST_LOG=snowprint=debug cargo run --example bridge_flow`

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use alloy_provider::ProviderBuilder;
use async_trait::async_trait;
use snowprint::launchpad::{
    track_deployment, DeploymentExecutor, DeploymentStage, LaunchpadField, LaunchpadWizard,
};
use snowprint::providers::{AlloyChainProvider, BackendApiClient, SnowtraceClient};
use snowprint::testing::FakeChainProvider;
use snowprint::wizard::Advance;
use snowprint::{
    BridgeChain, BridgeConfig, BridgeOrchestrator, BridgeRequest, ChainProvider,
    EcosystemHealth, ExplorerApi, Result, SnowprintConfig, TokenSymbol, WalletSession,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_ACCOUNT: Address = address!("7F7D081724F0240c64C9E01CDe4626602f9a0192");
const DEMO_USDC: Address = address!("5425890298aed601595a70AB815c96711a31Bc65");

struct SimulatedDeployer;

#[async_trait]
impl DeploymentExecutor for SimulatedDeployer {
    async fn execute(&self, stage: DeploymentStage, _chain_id: &str) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(250)).await;
        info!(stage = %stage, "Stage finished");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snowprint=info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = SnowprintConfig::from_env()?;
    println!("🏔  Snowprint walkthrough ({})", config.environment);
    println!("==================================\n");

    // Step 1: probe the live endpoints; failures are reported, not fatal
    println!("1️⃣  Probing endpoints...");
    let avalanche = config.networks.get(BridgeChain::Avalanche);
    let rpc = AlloyChainProvider::new(ProviderBuilder::new().connect_http(avalanche.rpc_url().clone()));
    match rpc.chain_id().await {
        Ok(chain_id) => println!("   RPC {} reports chain {chain_id}", avalanche.rpc_url()),
        Err(e) => warn!(error = %e, "RPC endpoint unreachable"),
    }

    let api = BackendApiClient::new(config.api_url.as_str())?;
    match api.test_connection().await {
        Ok(body) => println!("   Backend {} answered {body}", api.base_url()),
        Err(e) => warn!(error = %e, "Explorer backend unreachable"),
    }

    let snowtrace = SnowtraceClient::new(
        config.snowtrace_url.as_str(),
        config.snowtrace_api_key.clone(),
    )?;
    match EcosystemHealth::fetch(&snowtrace).await {
        Ok(health) => println!(
            "   Snowtrace: {}/{} validators active, {} ms latency",
            health.active_validators(),
            health.validators.len(),
            health.latency_ms
        ),
        Err(e) => warn!(error = %e, "Failed to fetch ecosystem health data"),
    }

    // Step 2: bridge against an in-memory wallet
    println!("\n2️⃣  Bridging 25 USDC Ethereum → Avalanche (simulated wallet)...");
    let ethereum = config.networks.get(BridgeChain::Ethereum);
    let mut tokens = config.tokens.clone();
    let usdc = match tokens.address(TokenSymbol::Usdc, BridgeChain::Ethereum) {
        Ok(address) => address,
        Err(_) => {
            tokens.insert(TokenSymbol::Usdc, BridgeChain::Ethereum, DEMO_USDC);
            DEMO_USDC
        }
    };

    let wallet = FakeChainProvider::new(ethereum.chain_id()).with_account(DEMO_ACCOUNT);
    wallet.set_balance(usdc, DEMO_ACCOUNT, U256::from(100_000_000u64));

    let session = Arc::new(WalletSession::new(wallet.clone()));
    let requester = session.connect().await?;

    let orchestrator = BridgeOrchestrator::new(
        session,
        config.networks.clone(),
        tokens,
        BridgeConfig::default(),
    )?;

    let mut states = orchestrator.subscribe();
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            println!("   state: {state}");
            if state.is_terminal() {
                break;
            }
        }
    });

    let request = BridgeRequest::builder()
        .source_chain(BridgeChain::Ethereum)
        .destination_chain(BridgeChain::Avalanche)
        .token(TokenSymbol::Usdc)
        .amount("25")
        .requester(requester)
        .build();

    let fee = orchestrator
        .estimate_fee(request.source_chain(), request.destination_chain(), request.amount())
        .await?;
    println!("   Estimated cost: {} native", fee.formatted_total()?);

    let result = orchestrator.submit(&request).await?;
    watcher.await.ok();

    println!("   Approve tx: {}", result.approve_tx);
    println!("   Bridge tx:  {}", result.bridge_tx);
    if let Some(transfer_id) = result.transfer_id {
        let status = orchestrator
            .transfer_status(BridgeChain::Ethereum, transfer_id)
            .await?;
        println!("   Transfer {transfer_id}: {status}");
    }
    println!(
        "   Remaining balance: {} USDC",
        orchestrator
            .token_balance(BridgeChain::Ethereum, TokenSymbol::Usdc, requester)
            .await?
    );

    // Step 3: launch a chain
    println!("\n3️⃣  Launching a chain...");
    let mut wizard = LaunchpadWizard::launchpad();
    wizard.update_field(LaunchpadField::ChainName, "Glacier");
    wizard.update_field(LaunchpadField::Symbol, "GLCR");
    wizard.update_field(LaunchpadField::MaxSupply, "720000000");
    wizard.update_field(LaunchpadField::SubnetThreshold, "0.67");

    let launch = loop {
        match wizard.advance() {
            Ok(Advance::Moved(step)) => println!("   step {step}/{}", wizard.step_count()),
            Ok(Advance::Finalized(launch)) => break launch,
            Err(errors) => {
                for (field, message) in errors {
                    println!("   ❌ {field}: {message}");
                }
                return Ok(());
            }
        }
    };
    println!("   Launch request: {}", serde_json::to_string(&launch)?);

    let chain_id = launch.chain_name.to_lowercase();
    track_deployment(&SimulatedDeployer, &chain_id, |steps| {
        let done = steps
            .iter()
            .filter(|s| s.status == snowprint::launchpad::StepStatus::Completed)
            .count();
        println!("   [{done}/{}] deploying {chain_id}", steps.len());
    })
    .await?;

    println!("\n✅ Walkthrough complete");
    Ok(())
}
