//! Test utilities and fake implementations
//!
//! This module provides in-memory fakes for the external collaborators of the
//! crate: the wallet-backed chain, the explorer backend and the clock. They let
//! tests drive adversarial scenarios without a wallet, a node or a network.
//!
//! The chain fake decodes the fixed ABI fragments the crate speaks and answers
//! them from configurable tables, so the contract wrappers and the bridge
//! orchestrator run unmodified against it.

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, Log, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::contracts::bridge::AvalancheBridge::{
    bridgeCall, estimateFeeCall, getMaxAmountCall, getMinAmountCall, getTransactionStatusCall,
    isPausedCall, isSupportedCall, BridgeInitiated,
};
use crate::contracts::erc20::Erc20::{approveCall, balanceOfCall};
use crate::protocol::{
    Block, CrossChainTx, NetworkStats, ProposalsResponse, Transaction, TransferStatus,
    ValidatorHealth,
};
use crate::traits::{ChainProvider, Clock, ExplorerApi, HealthApi, TxReceipt};
use crate::{Result, SnowprintError};

// ============================================================================
// Fake Chain Provider
// ============================================================================

/// What happens to a broadcast transaction of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxOutcome {
    /// Mined with a success status.
    #[default]
    Success,
    /// Mined, but reverted.
    Reverted,
    /// Never mined; receipts stay `None`.
    NeverMined,
    /// Rejected by the wallet at broadcast time.
    Rejected,
}

#[derive(Debug, Default)]
struct ChainState {
    chain_id: u64,
    unavailable: bool,
    accounts: Vec<Address>,
    gas_price: u128,
    balances: HashMap<(Address, Address), U256>,
    paused: HashMap<Address, bool>,
    unsupported: HashSet<(Address, U256)>,
    limits: HashMap<(Address, Address), (U256, U256)>,
    quoted_fees: HashMap<Address, U256>,
    statuses: HashMap<(Address, FixedBytes<32>), u8>,
    approve_outcome: TxOutcome,
    bridge_outcome: TxOutcome,
    failing_calls: bool,
    sent: Vec<TransactionRequest>,
    receipts: HashMap<TxHash, Option<TxReceipt>>,
}

/// A fake wallet-backed chain.
///
/// This allows testing scenarios like:
/// - No wallet installed (`set_unavailable`)
/// - Wallet connected to the wrong network (`set_chain_id`)
/// - Paused bridges and per-token limits
/// - Rejected, reverted and never-mined transactions
///
/// Every broadcast transaction is recorded and can be inspected with
/// [`sent_transactions`](Self::sent_transactions).
#[derive(Clone, Debug, Default)]
pub struct FakeChainProvider {
    state: Arc<Mutex<ChainState>>,
    nonce: Arc<AtomicUsize>,
}

impl FakeChainProvider {
    /// Creates a reachable wallet on `chain_id` with no accounts and a 25 gwei gas price.
    pub fn new(chain_id: u64) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.lock().unwrap();
            state.chain_id = chain_id;
            state.gas_price = 25_000_000_000;
        }
        provider
    }

    /// Exposes `account` as the wallet's only account.
    pub fn with_account(self, account: Address) -> Self {
        self.set_accounts(vec![account]);
        self
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().unwrap().chain_id = chain_id;
    }

    /// Simulates a missing wallet: every method fails with `ProviderUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    pub fn set_gas_price(&self, wei: u128) {
        self.state.lock().unwrap().gas_price = wei;
    }

    pub fn set_balance(&self, token: Address, owner: Address, balance: U256) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((token, owner), balance);
    }

    pub fn set_paused(&self, bridge: Address, paused: bool) {
        self.state.lock().unwrap().paused.insert(bridge, paused);
    }

    /// Makes `bridge` report no route to `destination_chain_id`.
    ///
    /// Every route is supported unless marked here.
    pub fn set_unsupported_destination(&self, bridge: Address, destination_chain_id: u64) {
        self.state
            .lock()
            .unwrap()
            .unsupported
            .insert((bridge, U256::from(destination_chain_id)));
    }

    /// Sets the `[min, max]` transfer window of `token` on `bridge`.
    ///
    /// Unconfigured tokens accept any amount.
    pub fn set_limits(&self, bridge: Address, token: Address, min: U256, max: U256) {
        self.state
            .lock()
            .unwrap()
            .limits
            .insert((bridge, token), (min, max));
    }

    /// Sets the fee returned by `estimateFee` on `bridge`.
    pub fn set_quoted_fee(&self, bridge: Address, fee: U256) {
        self.state.lock().unwrap().quoted_fees.insert(bridge, fee);
    }

    pub fn set_transfer_status(
        &self,
        bridge: Address,
        transfer_id: FixedBytes<32>,
        status: TransferStatus,
    ) {
        let raw = match status {
            TransferStatus::Unknown => 0,
            TransferStatus::Pending => 1,
            TransferStatus::Completed => 2,
            TransferStatus::Failed => 3,
        };
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert((bridge, transfer_id), raw);
    }

    pub fn set_approve_outcome(&self, outcome: TxOutcome) {
        self.state.lock().unwrap().approve_outcome = outcome;
    }

    pub fn set_bridge_outcome(&self, outcome: TxOutcome) {
        self.state.lock().unwrap().bridge_outcome = outcome;
    }

    /// Makes every read-only call fail with an RPC error.
    pub fn set_failing_calls(&self, failing: bool) {
        self.state.lock().unwrap().failing_calls = failing;
    }

    /// Transactions broadcast so far, in order.
    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Whether `tx` is an ERC-20 `approve` call.
    pub fn is_approve(tx: &TransactionRequest) -> bool {
        selector_of(tx) == Some(approveCall::SELECTOR)
    }

    /// Whether `tx` is a bridge `bridge` call.
    pub fn is_bridge(tx: &TransactionRequest) -> bool {
        selector_of(tx) == Some(bridgeCall::SELECTOR)
    }

    fn check_available(&self) -> Result<()> {
        if self.state.lock().unwrap().unavailable {
            return Err(SnowprintError::ProviderUnavailable);
        }
        Ok(())
    }

    fn next_hash(&self) -> TxHash {
        let n = self.nonce.fetch_add(1, Ordering::SeqCst) as u64;
        keccak256(n.to_be_bytes())
    }
}

fn selector_of(tx: &TransactionRequest) -> Option<[u8; 4]> {
    let input = tx.input.input()?;
    input.get(..4).and_then(|s| s.try_into().ok())
}

#[async_trait]
impl ChainProvider for FakeChainProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.check_available()?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        self.check_available()?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        self.check_available()?;
        Ok(self.state.lock().unwrap().chain_id)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.check_available()?;
        Ok(self.state.lock().unwrap().gas_price)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        if state.failing_calls {
            return Err(SnowprintError::Provider("Simulated RPC error".to_string()));
        }

        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SnowprintError::ChainCall("empty calldata".to_string()))?;

        let output = match selector {
            balanceOfCall::SELECTOR => {
                let call = balanceOfCall::abi_decode(&input)?;
                state
                    .balances
                    .get(&(to, call.account))
                    .copied()
                    .unwrap_or_default()
                    .abi_encode()
            }
            isPausedCall::SELECTOR => state
                .paused
                .get(&to)
                .copied()
                .unwrap_or(false)
                .abi_encode(),
            isSupportedCall::SELECTOR => {
                let call = isSupportedCall::abi_decode(&input)?;
                (!state
                    .unsupported
                    .contains(&(to, call.destinationChainId)))
                .abi_encode()
            }
            getMinAmountCall::SELECTOR => {
                let call = getMinAmountCall::abi_decode(&input)?;
                state
                    .limits
                    .get(&(to, call.token))
                    .map(|(min, _)| *min)
                    .unwrap_or(U256::ZERO)
                    .abi_encode()
            }
            getMaxAmountCall::SELECTOR => {
                let call = getMaxAmountCall::abi_decode(&input)?;
                state
                    .limits
                    .get(&(to, call.token))
                    .map(|(_, max)| *max)
                    .unwrap_or(U256::MAX)
                    .abi_encode()
            }
            estimateFeeCall::SELECTOR => state
                .quoted_fees
                .get(&to)
                .copied()
                .unwrap_or_default()
                .abi_encode(),
            getTransactionStatusCall::SELECTOR => {
                let call = getTransactionStatusCall::abi_decode(&input)?;
                let raw = state
                    .statuses
                    .get(&(to, call.txHash))
                    .copied()
                    .unwrap_or(0);
                U256::from(raw).abi_encode()
            }
            _ => return Err(SnowprintError::ChainCall("execution reverted".to_string())),
        };

        Ok(Bytes::from(output))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        self.check_available()?;
        let outcome = {
            let state = self.state.lock().unwrap();
            if Self::is_approve(&tx) {
                state.approve_outcome
            } else if Self::is_bridge(&tx) {
                state.bridge_outcome
            } else {
                TxOutcome::Success
            }
        };

        if outcome == TxOutcome::Rejected {
            return Err(SnowprintError::Provider(
                "User rejected the request".to_string(),
            ));
        }

        let tx_hash = self.next_hash();
        let mut state = self.state.lock().unwrap();
        let block_number = state.sent.len() as u64 + 100;

        let logs = match (outcome, Self::is_bridge(&tx)) {
            (TxOutcome::Success, true) => bridge_logs(&tx, tx_hash),
            _ => Vec::new(),
        };
        let receipt = match outcome {
            TxOutcome::NeverMined => None,
            _ => Some(TxReceipt {
                tx_hash,
                block_number: Some(block_number),
                success: outcome == TxOutcome::Success,
                logs,
            }),
        };

        state.sent.push(tx);
        state.receipts.insert(tx_hash, receipt);
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .cloned()
            .unwrap_or(None))
    }
}

/// The `BridgeInitiated` event the contract emits for a successful `bridge` call.
///
/// The transfer id is the broadcast transaction hash.
fn bridge_logs(tx: &TransactionRequest, tx_hash: TxHash) -> Vec<Log> {
    let Some(input) = tx.input.input() else {
        return Vec::new();
    };
    let Ok(call) = bridgeCall::abi_decode(input) else {
        return Vec::new();
    };
    let (Some(bridge), Some(from)) = (tx.to.and_then(|to| to.to().copied()), tx.from) else {
        return Vec::new();
    };

    let event = BridgeInitiated {
        token: call.token,
        from,
        amount: call.amount,
        txHash: tx_hash,
    };
    vec![Log {
        address: bridge,
        data: event.encode_log_data(),
    }]
}

// ============================================================================
// Fake Explorer API
// ============================================================================

#[derive(Debug, Default)]
struct ExplorerState {
    network_stats: Option<NetworkStats>,
    latest_block: Option<Block>,
    transactions: Vec<Transaction>,
    cross_chain: Vec<CrossChainTx>,
    proposals: Option<ProposalsResponse>,
    validators: Option<Vec<ValidatorHealth>>,
    latency_ms: Option<f64>,
    failure: Option<String>,
}

/// A fake explorer backend serving canned responses.
///
/// Also stands in for the Snowtrace stats API through [`HealthApi`].
/// Endpoints without a canned response fail with [`SnowprintError::Api`].
#[derive(Clone, Debug, Default)]
pub struct FakeExplorerApi {
    state: Arc<Mutex<ExplorerState>>,
    calls: Arc<AtomicUsize>,
}

impl FakeExplorerApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_network_stats(&self, stats: NetworkStats) {
        self.state.lock().unwrap().network_stats = Some(stats);
    }

    pub fn set_latest_block(&self, block: Block) {
        self.state.lock().unwrap().latest_block = Some(block);
    }

    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.state.lock().unwrap().transactions = transactions;
    }

    pub fn set_cross_chain_transactions(&self, transactions: Vec<CrossChainTx>) {
        self.state.lock().unwrap().cross_chain = transactions;
    }

    pub fn set_proposals(&self, proposals: ProposalsResponse) {
        self.state.lock().unwrap().proposals = Some(proposals);
    }

    pub fn set_validators(&self, validators: Vec<ValidatorHealth>) {
        self.state.lock().unwrap().validators = Some(validators);
    }

    pub fn set_latency_ms(&self, latency_ms: f64) {
        self.state.lock().unwrap().latency_ms = Some(latency_ms);
    }

    /// Makes every endpoint fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        self.state.lock().unwrap().failure = message.map(str::to_string);
    }

    /// Total number of requests served, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve<T>(&self, pick: impl FnOnce(&ExplorerState) -> Option<T>) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if let Some(message) = &state.failure {
            return Err(SnowprintError::Api(message.clone()));
        }
        pick(&state).ok_or_else(|| SnowprintError::Api("no data".to_string()))
    }
}

#[async_trait]
impl ExplorerApi for FakeExplorerApi {
    async fn test_connection(&self) -> Result<serde_json::Value> {
        self.serve(|_| Some(serde_json::json!({ "status": "ok" })))
    }

    async fn network_stats(&self) -> Result<NetworkStats> {
        self.serve(|s| s.network_stats.clone())
    }

    async fn latest_block(&self) -> Result<Block> {
        self.serve(|s| s.latest_block.clone())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.serve(|s| Some(s.transactions.clone()))
    }

    async fn cross_chain_transactions(&self) -> Result<Vec<CrossChainTx>> {
        self.serve(|s| Some(s.cross_chain.clone()))
    }

    async fn proposals(&self) -> Result<ProposalsResponse> {
        self.serve(|s| s.proposals.clone())
    }
}

#[async_trait]
impl HealthApi for FakeExplorerApi {
    async fn validators(&self) -> Result<Vec<ValidatorHealth>> {
        self.serve(|s| s.validators.clone())
    }

    async fn latency_ms(&self) -> Result<f64> {
        self.serve(|s| s.latency_ms)
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
///
/// Sleeping returns immediately and advances the clock by the requested
/// duration, so confirmation timeouts can be exercised without waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}
