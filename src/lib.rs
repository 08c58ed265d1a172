//! # snowprint
//!
//! Client core for the Snowprint Avalanche explorer.
//!
//! The crate bundles the pieces of the explorer that do real work behind the
//! user interface:
//!
//! - an approve-then-bridge orchestrator for moving ERC-20 tokens between
//!   Ethereum and the Avalanche C-Chain
//! - a generic multi-step form engine, with the chain launchpad form and its
//!   deployment tracker built on top
//! - the token registry and network table for mainnet and testnet
//! - a wallet session that tracks the connected account and chain
//! - a client and pollers for the explorer's REST backend, plus ecosystem
//!   health figures from the Snowtrace stats API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snowprint::{
//!     BridgeChain, BridgeConfig, BridgeOrchestrator, BridgeRequest, SnowprintConfig,
//!     TokenSymbol, WalletSession,
//! };
//! use snowprint::providers::AlloyChainProvider;
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> snowprint::Result<()> {
//! let config = SnowprintConfig::from_env()?;
//! let rpc = config.networks.get(BridgeChain::Avalanche).rpc_url().clone();
//!
//! let session = Arc::new(WalletSession::new(AlloyChainProvider::new(
//!     ProviderBuilder::new().connect_http(rpc),
//! )));
//! let requester = session.connect().await?;
//!
//! let orchestrator = BridgeOrchestrator::new(
//!     session,
//!     config.networks,
//!     config.tokens,
//!     BridgeConfig::default(),
//! )?;
//!
//! let request = BridgeRequest::builder()
//!     .source_chain(BridgeChain::Avalanche)
//!     .destination_chain(BridgeChain::Ethereum)
//!     .token(TokenSymbol::Usdc)
//!     .amount("10.5")
//!     .requester(requester)
//!     .build();
//!
//! let fee = orchestrator
//!     .estimate_fee(request.source_chain(), request.destination_chain(), request.amount())
//!     .await?;
//! println!("estimated cost: {} native", fee.formatted_total()?);
//!
//! let result = orchestrator.submit(&request).await?;
//! println!("approve {} bridge {}", result.approve_tx, result.bridge_tx);
//! # Ok(())
//! # }
//! ```
//!
//! ## Explorer Data
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snowprint::poller::Poller;
//! use snowprint::providers::BackendApiClient;
//!
//! # async fn example() -> snowprint::Result<()> {
//! let api = Arc::new(BackendApiClient::local()?);
//! let mut stats = Poller::network_stats(api, Duration::from_secs(10));
//!
//! let mut updates = stats.subscribe();
//! updates.changed().await.ok();
//! println!("{:?}", stats.state());
//! stats.stop();
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`BridgeOrchestrator`], [`BridgeRequest`] and [`BridgeTransactionState`] - the bridge flow
//! - [`TokenRegistry`], [`NetworkSet`] and [`BridgeChain`] - static chain and token data
//! - [`WalletSession`] - connected account, chain id and signer lock
//! - [`wizard`] and [`launchpad`] - the form engine and the chain launchpad
//! - [`poller`] and [`providers::BackendApiClient`] - explorer backend access
//! - [`providers::SnowtraceClient`] and [`EcosystemHealth`] - validator and latency figures
//! - [`ChainProvider`], [`ExplorerApi`], [`HealthApi`] and [`Clock`] - seams for the fakes in [`testing`]
//! - [`SnowprintError`] and [`Result`] - error types for error handling

mod bridge;
mod chain;
mod config;
mod contracts;
mod error;
mod protocol;
mod wallet;

pub use bridge::{
    BridgeConfig, BridgeOrchestrator, BridgeRequest, BridgeTransactionState, FeeEstimate,
    FeeModel, PollingConfig, TransactionResult, ValidatedTransfer, DEFAULT_APPROVE_GAS,
    DEFAULT_BRIDGE_FEE_WEI, DEFAULT_BRIDGE_GAS,
};
pub use chain::addresses::{BRIDGE_ADDRESS_MAINNET, BRIDGE_ADDRESS_TESTNET};
pub use chain::{
    BridgeChain, Environment, NetworkConfig, NetworkSet, Token, TokenRegistry, TokenSymbol,
};
pub use config::SnowprintConfig;
pub use contracts::{
    bridge::{find_bridge_initiated, BridgeContract},
    erc20::Erc20Contract,
};
pub use error::{Result, SnowprintError, ValidationError};
pub use protocol::{
    BaseResponse, Block, CrossChainKind, CrossChainStatus, CrossChainTx, EcosystemHealth,
    NetworkStats, Proposal, ProposalStatus, ProposalsResponse, StatsResponse, Transaction,
    TransferStatus, ValidatorHealth,
};
pub use traits::{ChainProvider, Clock, ExplorerApi, HealthApi, TxReceipt};
pub use wallet::{WalletSession, WalletState};

pub mod launchpad;
pub mod poller;
pub mod providers;
pub mod testing;
pub mod traits;
pub mod units;
pub mod wizard;

// Public module for advanced users who need custom instrumentation
pub mod spans;
