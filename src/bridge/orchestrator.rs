// SPDX-FileCopyrightText: 2025 Snowprint Contributors
//
// SPDX-License-Identifier: Apache-2.0
//! Approve-then-bridge orchestration

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, Instrument};

use super::config::{BridgeConfig, FeeModel};
use super::fee::FeeEstimate;
use super::request::{BridgeRequest, TransactionResult, ValidatedTransfer};
use super::state::BridgeTransactionState;
use super::validation::{check_balance, check_limits, check_network, check_request};
use crate::chain::{BridgeChain, NetworkSet, TokenRegistry, TokenSymbol};
use crate::contracts::bridge::{find_bridge_initiated, BridgeContract};
use crate::contracts::erc20::Erc20Contract;
use crate::error::{Result, SnowprintError, ValidationError};
use crate::protocol::TransferStatus;
use crate::providers::TokioClock;
use crate::spans;
use crate::traits::{ChainProvider, Clock, TxReceipt};
use crate::units::{from_base_units, to_base_units, NATIVE_DECIMALS};
use crate::wallet::WalletSession;

/// Drives a token transfer through the bridge contract.
///
/// A submission approves the bridge to spend the requested amount, waits for
/// that approval to be mined, then calls the payable `bridge` function with the
/// configured native fee and waits for it to be mined. Progress is published
/// as a [`BridgeTransactionState`] on a watch channel.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use snowprint::{
///     BridgeChain, BridgeConfig, BridgeOrchestrator, BridgeRequest, Environment, NetworkSet,
///     TokenRegistry, TokenSymbol, WalletSession,
/// };
/// use snowprint::testing::FakeChainProvider;
///
/// # async fn example() -> snowprint::Result<()> {
/// let session = Arc::new(WalletSession::new(FakeChainProvider::new(1)));
/// let requester = session.connect().await?;
///
/// let orchestrator = BridgeOrchestrator::new(
///     session,
///     NetworkSet::defaults(Environment::Mainnet)?,
///     TokenRegistry::with_defaults(Environment::Mainnet),
///     BridgeConfig::default(),
/// )?;
///
/// let request = BridgeRequest::builder()
///     .source_chain(BridgeChain::Ethereum)
///     .destination_chain(BridgeChain::Avalanche)
///     .token(TokenSymbol::Usdc)
///     .amount("25")
///     .requester(requester)
///     .build();
///
/// let result = orchestrator.submit(&request).await?;
/// println!("bridged in {}", result.bridge_tx);
/// # Ok(())
/// # }
/// ```
pub struct BridgeOrchestrator<P, C = TokioClock> {
    session: Arc<WalletSession<P>>,
    networks: NetworkSet,
    tokens: TokenRegistry,
    config: BridgeConfig,
    clock: C,
    state: watch::Sender<BridgeTransactionState>,
    submission: Mutex<()>,
}

impl<P: ChainProvider> BridgeOrchestrator<P, TokioClock> {
    /// Creates an orchestrator that waits on the Tokio timer.
    ///
    /// # Errors
    ///
    /// Returns [`SnowprintError::InvalidConfig`] if the token registry and the
    /// networks belong to different environments.
    pub fn new(
        session: Arc<WalletSession<P>>,
        networks: NetworkSet,
        tokens: TokenRegistry,
        config: BridgeConfig,
    ) -> Result<Self> {
        if networks.environment() != tokens.environment() {
            return Err(SnowprintError::InvalidConfig(format!(
                "token registry is for {} but networks are for {}",
                tokens.environment(),
                networks.environment()
            )));
        }

        let (state, _) = watch::channel(BridgeTransactionState::Idle);
        Ok(Self {
            session,
            networks,
            tokens,
            config,
            clock: TokioClock,
            state,
            submission: Mutex::new(()),
        })
    }
}

impl<P: ChainProvider, C: Clock> BridgeOrchestrator<P, C> {
    /// Replaces the clock used for confirmation polling.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BridgeOrchestrator<P, C2> {
        BridgeOrchestrator {
            session: self.session,
            networks: self.networks,
            tokens: self.tokens,
            config: self.config,
            clock,
            state: self.state,
            submission: self.submission,
        }
    }

    pub fn session(&self) -> &Arc<WalletSession<P>> {
        &self.session
    }

    pub fn networks(&self) -> &NetworkSet {
        &self.networks
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Current submission state.
    pub fn state(&self) -> BridgeTransactionState {
        self.state.borrow().clone()
    }

    /// Receives every state transition.
    pub fn subscribe(&self) -> watch::Receiver<BridgeTransactionState> {
        self.state.subscribe()
    }

    /// Returns to `Idle`, unless a submission is in flight.
    ///
    /// Returns `false` when the reset was refused.
    pub fn reset(&self) -> bool {
        match self.submission.try_lock() {
            Ok(_guard) => {
                self.set_state(BridgeTransactionState::Idle);
                true
            }
            Err(_) => false,
        }
    }

    fn set_state(&self, next: BridgeTransactionState) {
        debug!(state = %next, event = "bridge_state_changed");
        self.state.send_replace(next);
    }

    fn provider(&self) -> &P {
        self.session.provider()
    }

    fn bridge_address(&self, chain: BridgeChain) -> Result<Address> {
        let address = self.networks.get(chain).bridge_address();
        if address == Address::ZERO {
            return Err(SnowprintError::InvalidConfig(format!(
                "no bridge contract configured for {chain}"
            )));
        }
        Ok(address)
    }

    /// Estimates the native cost of bridging `amount` from `source` to `destination`.
    ///
    /// # Errors
    ///
    /// - [`SnowprintError::ProviderUnavailable`] if the wallet is not connected
    /// - [`ValidationError::InvalidAmount`] if `amount` does not parse
    pub async fn estimate_fee(
        &self,
        source: BridgeChain,
        destination: BridgeChain,
        amount: &str,
    ) -> Result<FeeEstimate> {
        let model = match self.config.fee_model {
            FeeModel::GasBudget => "gas_budget",
            FeeModel::ContractQuote => "contract_quote",
        };
        let span = spans::estimate_fee(source, destination, model);

        async {
            if !self.session.is_connected() {
                return Err(SnowprintError::ProviderUnavailable);
            }
            let amount_wei = to_base_units(amount, NATIVE_DECIMALS)?;

            let gas_price = self.provider().gas_price().await?;
            let bridge_fee = match self.config.fee_model {
                FeeModel::GasBudget => self.config.bridge_fee,
                FeeModel::ContractQuote => {
                    let destination_chain_id = destination.chain_id(self.networks.environment());
                    BridgeContract::new(self.bridge_address(source)?, self.provider())
                        .estimate_fee(destination_chain_id, amount_wei)
                        .await?
                }
            };

            let estimate = FeeEstimate::new(gas_price, self.config.gas_budget(), bridge_fee);
            info!(
                source_chain = %source,
                destination_chain = %destination,
                gas_price = gas_price,
                gas_units = estimate.gas_units,
                total = %estimate.total,
                event = "fee_estimated"
            );
            Ok(estimate)
        }
        .instrument(span)
        .await
    }

    /// Runs every pre-flight check, failing on the first problem.
    ///
    /// Checks, in order: distinct chains, a positive well-formed amount, the
    /// requester's balance, the bridge pause flag, the bridge's per-token
    /// limits, the wallet's network and finally whether the source bridge
    /// routes to the destination chain. The first two are local; address
    /// resolution errors surface before any chain read.
    pub async fn validate(&self, request: &BridgeRequest) -> Result<ValidatedTransfer> {
        let span = spans::validate_transfer(
            request.source_chain(),
            request.destination_chain(),
            request.token(),
        );

        async {
            let result = self.run_validation(request).await;
            if let Err(e) = &result {
                spans::record_error(e);
                info!(
                    reason = %e,
                    token = %request.token(),
                    event = "bridge_request_rejected"
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_validation(&self, request: &BridgeRequest) -> Result<ValidatedTransfer> {
        let amount = check_request(request)?;

        let source = self.networks.get(request.source_chain());
        let token_address = self.tokens.address(request.token(), request.source_chain())?;
        let bridge_address = self.bridge_address(request.source_chain())?;

        let balance = Erc20Contract::new(token_address, self.provider())
            .balance_of(request.requester())
            .await?;
        check_balance(amount, balance)?;

        let bridge = BridgeContract::new(bridge_address, self.provider());
        if bridge.is_paused().await? {
            return Err(ValidationError::BridgePaused.into());
        }

        let min = bridge.min_amount(token_address).await?;
        let max = bridge.max_amount(token_address).await?;
        check_limits(amount, min, max)?;

        let actual = self.provider().chain_id().await?;
        check_network(source.chain_id(), actual)?;

        let destination_chain_id = self.networks.get(request.destination_chain()).chain_id();
        if !bridge.is_supported(destination_chain_id).await? {
            return Err(ValidationError::UnsupportedPair {
                source_chain: request.source_chain(),
                destination_chain: request.destination_chain(),
            }
            .into());
        }

        Ok(ValidatedTransfer {
            request: request.clone(),
            token_address,
            bridge_address,
            amount,
            balance,
        })
    }

    /// Validates and executes a bridge request.
    ///
    /// Holds the wallet session's signer for the whole submission. The bridge
    /// call is only broadcast after the approval is confirmed. Any failure
    /// leaves the state at `Failed` with the error message; nothing is retried
    /// or resumed, so a new submission starts over from the approval.
    ///
    /// # Errors
    ///
    /// - [`SnowprintError::SubmissionInProgress`] if this orchestrator is mid-submission
    /// - [`SnowprintError::ProviderUnavailable`] if the wallet is not connected
    /// - [`SnowprintError::Validation`] for rejected requests
    /// - [`SnowprintError::TransactionFailed`] when a broadcast or confirmation fails
    pub async fn submit(&self, request: &BridgeRequest) -> Result<TransactionResult> {
        let Ok(_submission) = self.submission.try_lock() else {
            return Err(SnowprintError::SubmissionInProgress);
        };

        let span = spans::submit_bridge(
            request.source_chain(),
            request.destination_chain(),
            request.token(),
            request.amount(),
        );

        async {
            let _signer = self.session.lock_signer().await;
            self.set_state(BridgeTransactionState::Idle);

            let result = self.run_submission(request).await;
            match &result {
                Ok(outcome) => {
                    self.set_state(BridgeTransactionState::Completed);
                    info!(
                        approve_tx = %outcome.approve_tx,
                        bridge_tx = %outcome.bridge_tx,
                        amount = %outcome.amount,
                        event = "bridge_transfer_completed"
                    );
                }
                Err(e) => {
                    spans::record_error(e);
                    error!(error = %e, event = "bridge_transfer_failed");
                    self.set_state(BridgeTransactionState::Failed(e.to_string()));
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_submission(&self, request: &BridgeRequest) -> Result<TransactionResult> {
        let from = self.session.account()?;
        if request.requester() != from {
            return Err(ValidationError::RequesterMismatch {
                requester: request.requester(),
                signer: from,
            }
            .into());
        }
        let transfer = self.run_validation(request).await?;
        let chain = request.source_chain();

        info!(
            from = %from,
            token = %request.token(),
            amount = %transfer.amount,
            source_chain = %chain,
            destination_chain = %request.destination_chain(),
            event = "bridge_transfer_initiated"
        );

        self.set_state(BridgeTransactionState::EstimatingGas);
        let gas_price = self.provider().gas_price().await?;
        debug!(
            gas_price = gas_price,
            gas_units = self.config.gas_budget(),
            event = "submission_gas_price_read"
        );

        self.set_state(BridgeTransactionState::AwaitingApproval);
        let approve = Erc20Contract::new(transfer.token_address, self.provider())
            .approve_transaction(from, transfer.bridge_address, transfer.amount);
        let approve_tx = self.broadcast("approve", chain, approve).await?;

        self.set_state(BridgeTransactionState::ApprovalPending);
        self.wait_for_confirmation("approve", approve_tx).await?;

        self.set_state(BridgeTransactionState::AwaitingBridgeCall);
        let bridge = BridgeContract::new(transfer.bridge_address, self.provider());
        let bridge_call = bridge.bridge_transaction(
            from,
            transfer.token_address,
            transfer.amount,
            self.config.bridge_fee,
        );
        let bridge_tx = self.broadcast("bridge", chain, bridge_call).await?;

        self.set_state(BridgeTransactionState::BridgePending);
        let receipt = self.wait_for_confirmation("bridge", bridge_tx).await?;

        let transfer_id =
            find_bridge_initiated(transfer.bridge_address, &receipt.logs).map(|event| event.txHash);

        Ok(TransactionResult {
            approve_tx,
            bridge_tx,
            amount: transfer.amount,
            bridge_block: receipt.block_number,
            transfer_id,
        })
    }

    async fn broadcast(
        &self,
        phase: &'static str,
        chain: BridgeChain,
        tx: TransactionRequest,
    ) -> Result<TxHash> {
        let span = spans::send_transaction(phase, chain);
        async {
            match self.provider().send_transaction(tx).await {
                Ok(tx_hash) => {
                    tracing::Span::current().record("tx_hash", tracing::field::display(tx_hash));
                    info!(
                        phase = phase,
                        tx_hash = %tx_hash,
                        event = "transaction_broadcast"
                    );
                    Ok(tx_hash)
                }
                Err(e) => {
                    error!(phase = phase, error = %e, event = "transaction_broadcast_failed");
                    Err(SnowprintError::TransactionFailed {
                        reason: format!("{phase} broadcast failed: {e}"),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Polls for a receipt until the transaction has one confirmation.
    async fn wait_for_confirmation(&self, phase: &'static str, tx_hash: TxHash) -> Result<TxReceipt> {
        let polling = self.config.polling;
        let span = spans::wait_for_confirmation(
            tx_hash,
            polling.max_attempts,
            polling.poll_interval_secs,
        );

        async {
            for attempt in 1..=polling.max_attempts {
                let receipt = self
                    .provider()
                    .transaction_receipt(tx_hash)
                    .await
                    .map_err(|e| SnowprintError::TransactionFailed {
                        reason: format!("{phase} receipt lookup failed: {e}"),
                    })?;

                match receipt {
                    Some(receipt) if receipt.is_confirmed() => {
                        if !receipt.success {
                            spans::record_error_with_context(
                                "TransactionReverted",
                                &format!("{phase} transaction {tx_hash} reverted"),
                                receipt.block_number.map(|b| format!("Block {b}")).as_deref(),
                            );
                            return Err(SnowprintError::TransactionFailed {
                                reason: format!("{phase} transaction {tx_hash} reverted"),
                            });
                        }
                        info!(
                            phase = phase,
                            tx_hash = %tx_hash,
                            block_number = ?receipt.block_number,
                            attempt = attempt,
                            event = "transaction_confirmed"
                        );
                        return Ok(receipt);
                    }
                    _ => {
                        debug!(attempt = attempt, event = "transaction_not_mined");
                        self.clock
                            .sleep(Duration::from_secs(polling.poll_interval_secs))
                            .await;
                    }
                }
            }

            spans::record_error_with_context(
                "ConfirmationTimeout",
                &format!(
                    "{phase} transaction not confirmed after {} attempts",
                    polling.max_attempts
                ),
                Some(&format!(
                    "Total duration: {} seconds",
                    polling.total_timeout_secs()
                )),
            );
            Err(SnowprintError::TransactionFailed {
                reason: format!(
                    "{phase} transaction {tx_hash} not confirmed after {} seconds",
                    polling.total_timeout_secs()
                ),
            })
        }
        .instrument(span)
        .await
    }

    /// Status of a transfer as recorded by the source chain's bridge contract.
    ///
    /// `transfer_id` is [`TransactionResult::transfer_id`], or the bridge
    /// transaction hash when the contract emitted no id.
    pub async fn transfer_status(
        &self,
        source: BridgeChain,
        transfer_id: TxHash,
    ) -> Result<TransferStatus> {
        let bridge = self.bridge_address(source)?;
        let status = BridgeContract::new(bridge, self.provider())
            .transaction_status(transfer_id)
            .await?;
        debug!(
            transfer_id = %transfer_id,
            status = %status,
            event = "transfer_status_retrieved"
        );
        Ok(status)
    }

    /// Balance of `owner` in `token` on `chain`, formatted in whole tokens.
    pub async fn token_balance(
        &self,
        chain: BridgeChain,
        token: TokenSymbol,
        owner: Address,
    ) -> Result<String> {
        let resolved = self.tokens.resolve(token, chain)?;
        let balance = Erc20Contract::new(resolved.address, self.provider())
            .balance_of(owner)
            .await?;
        from_base_units(balance, resolved.decimals())
    }

    /// Raw balance of `owner` in `token` on `chain`, in base units.
    pub async fn token_balance_raw(
        &self,
        chain: BridgeChain,
        token: TokenSymbol,
        owner: Address,
    ) -> Result<U256> {
        let address = self.tokens.address(token, chain)?;
        Erc20Contract::new(address, self.provider())
            .balance_of(owner)
            .await
    }
}
