//! Core trait abstractions for the explorer client.
//!
//! The wallet, the backend API, the health stats API and time are external
//! collaborators. Each one sits behind a trait so the bridge orchestrator, the
//! pollers and the wallet session can run against fakes (see
//! [`crate::testing`]) as well as against the production implementations in
//! [`crate::providers`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use snowprint::{ChainProvider, TxReceipt};
//!
//! struct ReadOnlyChain;
//!
//! #[async_trait::async_trait]
//! impl ChainProvider for ReadOnlyChain {
//!     async fn chain_id(&self) -> Result<u64> {
//!         Ok(43113)
//!     }
//!     // ...
//! }
//! ```

use alloy_primitives::{Address, Bytes, Log, TxHash};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::protocol::{
    Block, CrossChainTx, NetworkStats, ProposalsResponse, Transaction, ValidatorHealth,
};

/// A mined transaction as seen by the connected provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// Block that included the transaction.
    pub block_number: Option<u64>,
    /// `false` if the transaction reverted.
    pub success: bool,
    pub logs: Vec<Log>,
}

impl TxReceipt {
    /// A receipt counts as one confirmation once it carries a block number.
    pub fn is_confirmed(&self) -> bool {
        self.block_number.is_some()
    }
}

/// Wallet-backed chain access.
///
/// Wraps a signing wallet connection: account discovery, network identity,
/// read-only contract calls and signed transaction submission.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Wallet on the wrong network
/// - Paused bridge contracts and out-of-range amounts
/// - Broadcast rejections
/// - Reverted or never-mined transactions
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Asks the wallet to expose its accounts, prompting the user if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SnowprintError::ProviderUnavailable`](crate::SnowprintError::ProviderUnavailable)
    /// if no wallet is reachable.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Accounts the wallet currently exposes, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Chain id of the network the wallet is connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Executes a read-only contract call and returns the raw return data.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// Signs and broadcasts a transaction.
    ///
    /// Returns once the transaction has been accepted by the node.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Fetches the receipt for a transaction.
    ///
    /// Returns `None` if the transaction is not mined yet.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>>;
}

/// Read-only explorer backend.
///
/// Every method maps to one `GET` endpoint of the backend REST API.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// `GET /test`
    async fn test_connection(&self) -> Result<serde_json::Value>;

    /// `GET /stats/network`
    async fn network_stats(&self) -> Result<NetworkStats>;

    /// `GET /stats/blocks/latest`
    async fn latest_block(&self) -> Result<Block>;

    /// `GET /stats/transactions`
    async fn transactions(&self) -> Result<Vec<Transaction>>;

    /// `GET /stats/cross-chain`
    async fn cross_chain_transactions(&self) -> Result<Vec<CrossChainTx>>;

    /// `GET /community/proposals`
    async fn proposals(&self) -> Result<ProposalsResponse>;
}

/// Ecosystem health figures from the Snowtrace stats API.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// `module=stats&action=validators`
    async fn validators(&self) -> Result<Vec<ValidatorHealth>>;

    /// `module=stats&action=latency`, in milliseconds.
    async fn latency_ms(&self) -> Result<f64>;
}

/// Trait for time-based operations.
///
/// This trait abstracts sleep and time queries, enabling fast-forward testing
/// where tests can instantly advance through confirmation polling without
/// actually waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Returns the current instant in time.
    fn now(&self) -> Instant;
}
