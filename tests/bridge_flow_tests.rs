//! Integration tests for the approve-then-bridge flow using fake implementations
//!
//! Every scenario runs the real orchestrator, contract wrappers and wallet
//! session against an in-memory chain, so the assertions cover exactly the
//! transactions a wallet would have been asked to sign.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use snowprint::testing::{FakeChainProvider, FakeClock, TxOutcome};
use snowprint::{
    BridgeChain, BridgeConfig, BridgeOrchestrator, BridgeRequest, BridgeTransactionState,
    ChainProvider, Environment, FeeModel, NetworkSet, PollingConfig, SnowprintError,
    TokenRegistry, TokenSymbol, TransferStatus, ValidationError, WalletSession,
    DEFAULT_BRIDGE_FEE_WEI,
};
use snowprint::providers::TokioClock;

const ALICE: Address = address!("7F7D081724F0240c64C9E01CDe4626602f9a0192");

fn usdc_on_ethereum() -> Address {
    TokenRegistry::with_defaults(Environment::Mainnet)
        .address(TokenSymbol::Usdc, BridgeChain::Ethereum)
        .unwrap()
}

fn ethereum_bridge() -> Address {
    NetworkSet::defaults(Environment::Mainnet)
        .unwrap()
        .get(BridgeChain::Ethereum)
        .bridge_address()
}

/// Wallet on Ethereum mainnet holding 100 USDC.
fn funded_provider() -> FakeChainProvider {
    let provider = FakeChainProvider::new(1).with_account(ALICE);
    provider.set_balance(usdc_on_ethereum(), ALICE, U256::from(100_000_000u64));
    provider
}

fn test_config() -> BridgeConfig {
    BridgeConfig::builder()
        .polling(
            PollingConfig::default()
                .with_max_attempts(5)
                .with_poll_interval_secs(2),
        )
        .build()
}

async fn create_orchestrator(
    provider: FakeChainProvider,
    config: BridgeConfig,
) -> BridgeOrchestrator<FakeChainProvider, FakeClock> {
    let session = Arc::new(WalletSession::new(provider));
    session.connect().await.unwrap();
    BridgeOrchestrator::new(
        session,
        NetworkSet::defaults(Environment::Mainnet).unwrap(),
        TokenRegistry::with_defaults(Environment::Mainnet),
        config,
    )
    .unwrap()
    .with_clock(FakeClock::new())
}

fn request(amount: &str) -> BridgeRequest {
    BridgeRequest::builder()
        .source_chain(BridgeChain::Ethereum)
        .destination_chain(BridgeChain::Avalanche)
        .token(TokenSymbol::Usdc)
        .amount(amount)
        .requester(ALICE)
        .build()
}

fn validation_kind(err: &SnowprintError) -> Option<&'static str> {
    err.as_validation().map(ValidationError::kind)
}

#[tokio::test]
async fn test_validate_accepts_funded_request() {
    let orchestrator = create_orchestrator(funded_provider(), test_config()).await;

    let transfer = orchestrator.validate(&request("25")).await.unwrap();

    assert_eq!(transfer.amount, U256::from(25_000_000u64));
    assert_eq!(transfer.balance, U256::from(100_000_000u64));
    assert_eq!(transfer.token_address, usdc_on_ethereum());
    assert_eq!(transfer.bridge_address, ethereum_bridge());
}

#[tokio::test]
async fn test_same_chain_reported_before_amount() {
    let orchestrator = create_orchestrator(funded_provider(), test_config()).await;
    let request = BridgeRequest::builder()
        .source_chain(BridgeChain::Avalanche)
        .destination_chain(BridgeChain::Avalanche)
        .token(TokenSymbol::Usdc)
        .amount("not a number")
        .requester(ALICE)
        .build();

    let err = orchestrator.validate(&request).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("SameChainError"));
}

#[tokio::test]
async fn test_malformed_amounts_rejected() {
    let orchestrator = create_orchestrator(funded_provider(), test_config()).await;

    for amount in ["-5", "abc", "0", ""] {
        let err = orchestrator.validate(&request(amount)).await.unwrap_err();
        assert_eq!(
            validation_kind(&err),
            Some("InvalidAmountError"),
            "amount {amount:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_insufficient_balance() {
    let provider = FakeChainProvider::new(1).with_account(ALICE);
    provider.set_balance(usdc_on_ethereum(), ALICE, U256::from(10_000_000u64));
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.validate(&request("15")).await.unwrap_err();

    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InsufficientBalance {
            requested: U256::from(15_000_000u64),
            available: U256::from(10_000_000u64),
        })
    );
    assert!(provider.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_paused_bridge_rejected() {
    let provider = funded_provider();
    provider.set_paused(ethereum_bridge(), true);
    let orchestrator = create_orchestrator(provider, test_config()).await;

    let err = orchestrator.validate(&request("1")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("BridgePausedError"));
}

#[tokio::test]
async fn test_amount_limits_are_inclusive() {
    let provider = funded_provider();
    provider.set_limits(
        ethereum_bridge(),
        usdc_on_ethereum(),
        U256::from(5_000_000u64),
        U256::from(50_000_000u64),
    );
    let orchestrator = create_orchestrator(provider, test_config()).await;

    let err = orchestrator.validate(&request("4.99")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("AmountOutOfRangeError"));

    let err = orchestrator.validate(&request("50.01")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("AmountOutOfRangeError"));

    assert!(orchestrator.validate(&request("5")).await.is_ok());
    assert!(orchestrator.validate(&request("50")).await.is_ok());
}

#[tokio::test]
async fn test_wrong_network_rejected() {
    let provider = funded_provider();
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;
    provider.set_chain_id(43114);

    let err = orchestrator.validate(&request("1")).await.unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::WrongNetwork {
            expected: 1,
            actual: 43114,
        })
    );
}

#[tokio::test]
async fn test_unsupported_pair_rejected_after_network_check() {
    let provider = funded_provider();
    provider.set_unsupported_destination(ethereum_bridge(), 43114);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.validate(&request("1")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("UnsupportedPairError"));
    assert!(err
        .to_string()
        .contains("Bridge not available for this network pair"));

    // a wallet on the wrong chain is reported first
    provider.set_chain_id(43114);
    let err = orchestrator.validate(&request("1")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("WrongNetworkError"));

    provider.set_chain_id(1);
    let err = orchestrator.submit(&request("1")).await.unwrap_err();
    assert_eq!(validation_kind(&err), Some("UnsupportedPairError"));
    assert!(provider.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_validate_without_wallet_is_provider_error() {
    let provider = funded_provider();
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;
    provider.set_unavailable(true);

    let err = orchestrator.validate(&request("1")).await.unwrap_err();
    assert!(matches!(err, SnowprintError::ProviderUnavailable));
}

#[tokio::test]
async fn test_unknown_token_on_chain() {
    let orchestrator = create_orchestrator(funded_provider(), test_config()).await;
    let request = BridgeRequest::builder()
        .source_chain(BridgeChain::Ethereum)
        .destination_chain(BridgeChain::Avalanche)
        .token(TokenSymbol::Crv)
        .amount("1")
        .requester(ALICE)
        .build();

    let err = orchestrator.validate(&request).await.unwrap_err();
    assert!(matches!(err, SnowprintError::UnknownToken { .. }));
}

#[tokio::test]
async fn test_successful_submission_approves_then_bridges() {
    let provider = funded_provider();
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let result = orchestrator.submit(&request("25")).await.unwrap();

    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 2);
    assert!(FakeChainProvider::is_approve(&sent[0]));
    assert!(FakeChainProvider::is_bridge(&sent[1]));
    assert_eq!(sent[0].from, Some(ALICE));
    assert_eq!(sent[1].value, Some(U256::from(DEFAULT_BRIDGE_FEE_WEI)));

    assert_eq!(result.amount, U256::from(25_000_000u64));
    assert_eq!(result.transfer_id, Some(result.bridge_tx));
    assert!(result.bridge_block.is_some());
    assert_eq!(orchestrator.state(), BridgeTransactionState::Completed);

    let approve = provider
        .transaction_receipt(result.approve_tx)
        .await
        .unwrap()
        .unwrap();
    assert!(approve.success);
}

#[tokio::test]
async fn test_rejected_approval_sends_no_bridge_call() {
    let provider = funded_provider();
    provider.set_approve_outcome(TxOutcome::Rejected);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.submit(&request("25")).await.unwrap_err();

    assert!(matches!(err, SnowprintError::TransactionFailed { .. }));
    assert!(provider.sent_transactions().is_empty());
    assert!(orchestrator.state().failure().is_some());
}

#[tokio::test]
async fn test_reverted_approval_sends_no_bridge_call() {
    let provider = funded_provider();
    provider.set_approve_outcome(TxOutcome::Reverted);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.submit(&request("25")).await.unwrap_err();

    assert!(
        matches!(err, SnowprintError::TransactionFailed { ref reason } if reason.contains("approve"))
    );
    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert!(FakeChainProvider::is_approve(&sent[0]));
    assert!(matches!(
        orchestrator.state(),
        BridgeTransactionState::Failed(ref reason) if reason.contains("reverted")
    ));
}

#[tokio::test]
async fn test_unmined_approval_times_out() {
    let provider = funded_provider();
    provider.set_approve_outcome(TxOutcome::NeverMined);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.submit(&request("25")).await.unwrap_err();

    assert!(
        matches!(err, SnowprintError::TransactionFailed { ref reason } if reason.contains("not confirmed after 10 seconds"))
    );
    assert_eq!(provider.sent_transactions().len(), 1);
}

#[tokio::test]
async fn test_reverted_bridge_call_fails_after_approval() {
    let provider = funded_provider();
    provider.set_bridge_outcome(TxOutcome::Reverted);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.submit(&request("25")).await.unwrap_err();

    assert!(
        matches!(err, SnowprintError::TransactionFailed { ref reason } if reason.contains("bridge"))
    );
    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 2);
    assert!(FakeChainProvider::is_approve(&sent[0]));
    assert!(FakeChainProvider::is_bridge(&sent[1]));
    assert!(matches!(
        orchestrator.state(),
        BridgeTransactionState::Failed(_)
    ));
}

#[tokio::test]
async fn test_validation_failure_marks_state_failed() {
    let provider = funded_provider();
    provider.set_paused(ethereum_bridge(), true);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let err = orchestrator.submit(&request("25")).await.unwrap_err();

    assert_eq!(validation_kind(&err), Some("BridgePausedError"));
    assert!(provider.sent_transactions().is_empty());
    assert_eq!(
        orchestrator.state().to_string(),
        "Failed: Validation failed: Bridge contract is paused"
    );
}

#[tokio::test]
async fn test_submit_refuses_request_for_another_account() {
    const BOB: Address = address!("2222222222222222222222222222222222222222");
    // ALICE signs but holds nothing; BOB is funded
    let provider = FakeChainProvider::new(1).with_account(ALICE);
    provider.set_balance(usdc_on_ethereum(), BOB, U256::from(100_000_000u64));
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    let request = BridgeRequest::builder()
        .source_chain(BridgeChain::Ethereum)
        .destination_chain(BridgeChain::Avalanche)
        .token(TokenSymbol::Usdc)
        .amount("50")
        .requester(BOB)
        .build();

    let err = orchestrator.submit(&request).await.unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::RequesterMismatch {
            requester: BOB,
            signer: ALICE,
        })
    );
    assert!(provider.sent_transactions().is_empty());
    assert!(matches!(
        orchestrator.state(),
        BridgeTransactionState::Failed(_)
    ));
}

#[tokio::test]
async fn test_resubmission_starts_from_approval() {
    let provider = funded_provider();
    provider.set_bridge_outcome(TxOutcome::Rejected);
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;

    orchestrator.submit(&request("25")).await.unwrap_err();
    provider.set_bridge_outcome(TxOutcome::Success);
    orchestrator.submit(&request("25")).await.unwrap();

    let sent = provider.sent_transactions();
    let kinds: Vec<bool> = sent.iter().map(FakeChainProvider::is_approve).collect();
    assert_eq!(kinds, vec![true, true, false]);
}

#[tokio::test]
async fn test_estimate_fee_before_connect() {
    let session = Arc::new(WalletSession::new(funded_provider()));
    let orchestrator = BridgeOrchestrator::new(
        session,
        NetworkSet::defaults(Environment::Mainnet).unwrap(),
        TokenRegistry::with_defaults(Environment::Mainnet),
        BridgeConfig::default(),
    )
    .unwrap();

    let err = orchestrator
        .estimate_fee(BridgeChain::Ethereum, BridgeChain::Avalanche, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, SnowprintError::ProviderUnavailable));
}

#[tokio::test]
async fn test_estimate_fee_with_contract_quote() {
    let provider = funded_provider();
    provider.set_quoted_fee(ethereum_bridge(), U256::from(5_000_000_000_000_000u64));
    let config = BridgeConfig::builder()
        .fee_model(FeeModel::ContractQuote)
        .build();
    let orchestrator = create_orchestrator(provider, config).await;

    let estimate = orchestrator
        .estimate_fee(BridgeChain::Ethereum, BridgeChain::Avalanche, "1")
        .await
        .unwrap();

    assert_eq!(estimate.bridge_fee, U256::from(5_000_000_000_000_000u64));
    insta::assert_snapshot!(estimate.formatted_total().unwrap(), @"0.0115");
}

#[tokio::test]
async fn test_transfer_status_after_submission() {
    let provider = funded_provider();
    let orchestrator = create_orchestrator(provider.clone(), test_config()).await;
    let result = orchestrator.submit(&request("25")).await.unwrap();
    let transfer_id = result.transfer_id.unwrap();

    assert_eq!(
        orchestrator
            .transfer_status(BridgeChain::Ethereum, transfer_id)
            .await
            .unwrap(),
        TransferStatus::Unknown
    );

    provider.set_transfer_status(ethereum_bridge(), transfer_id, TransferStatus::Completed);
    assert_eq!(
        orchestrator
            .transfer_status(BridgeChain::Ethereum, transfer_id)
            .await
            .unwrap(),
        TransferStatus::Completed
    );
}

#[tokio::test]
async fn test_token_balance_is_formatted() {
    let provider = funded_provider();
    provider.set_balance(usdc_on_ethereum(), ALICE, U256::from(10_500_000u64));
    let orchestrator = create_orchestrator(provider, test_config()).await;

    let balance = orchestrator
        .token_balance(BridgeChain::Ethereum, TokenSymbol::Usdc, ALICE)
        .await
        .unwrap();
    assert_eq!(balance, "10.5");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submission_refused() {
    let provider = funded_provider();
    provider.set_approve_outcome(TxOutcome::NeverMined);
    let session = Arc::new(WalletSession::new(provider.clone()));
    session.connect().await.unwrap();
    let orchestrator = BridgeOrchestrator::new(
        session,
        NetworkSet::defaults(Environment::Mainnet).unwrap(),
        TokenRegistry::with_defaults(Environment::Mainnet),
        test_config(),
    )
    .unwrap()
    .with_clock(TokioClock);

    let request = request("25");
    let first = orchestrator.submit(&request);
    tokio::pin!(first);

    // Drive the first submission until it is waiting on the approval receipt.
    tokio::select! {
        biased;
        _ = &mut first => panic!("submission should still be waiting"),
        _ = tokio::time::sleep(Duration::from_millis(1)) => {}
    }

    assert_eq!(orchestrator.state(), BridgeTransactionState::ApprovalPending);
    assert!(!orchestrator.reset());

    let err = orchestrator.submit(&request).await.unwrap_err();
    assert!(matches!(err, SnowprintError::SubmissionInProgress));
    assert_eq!(provider.sent_transactions().len(), 1);

    let err = first.await.unwrap_err();
    assert!(matches!(err, SnowprintError::TransactionFailed { .. }));
    assert!(orchestrator.reset());
    assert_eq!(orchestrator.state(), BridgeTransactionState::Idle);
}
