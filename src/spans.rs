// SPDX-FileCopyrightText: 2025 Snowprint Contributors
//
// SPDX-License-Identifier: Apache-2.0
//! OpenTelemetry span helpers for bridge and explorer operations
//!
//! Span names are static (`snowprint.*`) and carry structured attributes;
//! error attributes start empty and are filled in by [`record_error`] or
//! [`record_error_with_context`] on the current span.
//!
//! # Example
//!
//! ```rust,no_run
//! use snowprint::spans;
//! use snowprint::{BridgeChain, TokenSymbol};
//!
//! let span = spans::submit_bridge(
//!     BridgeChain::Ethereum,
//!     BridgeChain::Avalanche,
//!     TokenSymbol::Usdc,
//!     "1.5",
//! );
//! let _guard = span.enter();
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;
use url::Url;

use crate::chain::{BridgeChain, TokenSymbol};

/// Create span for a full approve-then-bridge submission.
///
/// Parent: Caller span
/// Children: snowprint.validate_transfer, snowprint.send_transaction,
/// snowprint.wait_for_confirmation
#[inline]
pub fn submit_bridge(
    source_chain: BridgeChain,
    destination_chain: BridgeChain,
    token: TokenSymbol,
    amount: &str,
) -> Span {
    tracing::info_span!(
        "snowprint.submit_bridge",
        source_chain = %source_chain,
        destination_chain = %destination_chain,
        token = %token,
        amount = amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for the pre-flight checks of a bridge request.
///
/// Parent: snowprint.submit_bridge, or the caller when validating alone
/// Children: Provider calls (balance, pause flag, limits, chain id)
#[inline]
pub fn validate_transfer(
    source_chain: BridgeChain,
    destination_chain: BridgeChain,
    token: TokenSymbol,
) -> Span {
    tracing::info_span!(
        "snowprint.validate_transfer",
        source_chain = %source_chain,
        destination_chain = %destination_chain,
        token = %token,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for fee estimation.
#[inline]
pub fn estimate_fee(source_chain: BridgeChain, destination_chain: BridgeChain, model: &str) -> Span {
    tracing::debug_span!(
        "snowprint.estimate_fee",
        source_chain = %source_chain,
        destination_chain = %destination_chain,
        fee_model = model,
    )
}

/// Create span for building the payable `bridge` call.
///
/// Parent: snowprint.submit_bridge
/// Children: None
#[inline]
pub fn bridge_call(from: &Address, token: &Address, amount: &U256, fee: &U256) -> Span {
    tracing::debug_span!(
        "snowprint.bridge_call",
        from = %from,
        token = %token,
        amount = %amount,
        fee = %fee,
    )
}

/// Create span for broadcasting one phase of a submission.
///
/// Parent: snowprint.submit_bridge
/// Children: Wallet RPC calls
#[inline]
pub fn send_transaction(phase: &'static str, chain: BridgeChain) -> Span {
    tracing::debug_span!(
        "snowprint.send_transaction",
        phase = phase,
        chain = %chain,
        tx_hash = tracing::field::Empty,
    )
}

/// Create span for waiting on a transaction receipt.
///
/// Parent: snowprint.submit_bridge
/// Children: Provider RPC calls (polling)
#[inline]
pub fn wait_for_confirmation(tx_hash: TxHash, max_attempts: u32, poll_interval_secs: u64) -> Span {
    tracing::debug_span!(
        "snowprint.wait_for_confirmation",
        tx_hash = %tx_hash,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
    )
}

/// Create span for HTTP request to the explorer backend.
///
/// Parent: Poller tick or caller span
/// Children: None (HTTP client handles internal spans)
#[inline]
pub fn http_request(method: &str, url: &Url) -> Span {
    tracing::trace_span!(
        "snowprint.http_request",
        http.method = method,
        http.url = %url,
        http.status_code = tracing::field::Empty,
    )
}

/// Create span for one launchpad deployment run.
#[inline]
pub fn deploy_chain(chain_name: &str) -> Span {
    tracing::info_span!(
        "snowprint.deploy_chain",
        chain_name = chain_name,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use snowprint::spans;
///
/// spans::record_error_with_context(
///     "TransactionFailed",
///     "Approval reverted",
///     Some("Bridge call was not sent"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
