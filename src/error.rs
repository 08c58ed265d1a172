use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::chain::{BridgeChain, TokenSymbol};

/// User-correctable problems with a bridge request.
///
/// These are produced by [`BridgeOrchestrator::validate`](crate::BridgeOrchestrator::validate)
/// and are always reported before any transaction is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Source and destination chains must be different")]
    SameChain,

    #[error("Amount must be a positive number: {input:?}")]
    InvalidAmount { input: String },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: U256, available: U256 },

    #[error("Bridge contract is paused")]
    BridgePaused,

    #[error("Amount {amount} outside bridge limits [{min}, {max}]")]
    AmountOutOfRange { amount: U256, min: U256, max: U256 },

    #[error("Wrong network: wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Bridge not available for this network pair: {source_chain} -> {destination_chain}")]
    UnsupportedPair {
        source_chain: BridgeChain,
        destination_chain: BridgeChain,
    },

    #[error("Request is for {requester} but the wallet signs as {signer}")]
    RequesterMismatch { requester: Address, signer: Address },
}

impl ValidationError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SameChain => "SameChainError",
            Self::InvalidAmount { .. } => "InvalidAmountError",
            Self::InsufficientBalance { .. } => "InsufficientBalanceError",
            Self::BridgePaused => "BridgePausedError",
            Self::AmountOutOfRange { .. } => "AmountOutOfRangeError",
            Self::WrongNetwork { .. } => "WrongNetworkError",
            Self::UnsupportedPair { .. } => "UnsupportedPairError",
            Self::RequesterMismatch { .. } => "RequesterMismatchError",
        }
    }
}

#[derive(Error, Debug)]
pub enum SnowprintError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No wallet connection available")]
    ProviderUnavailable,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ChainCall(String),

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Unknown token {symbol} on {chain}")]
    UnknownToken { symbol: String, chain: String },

    #[error("A bridge submission is already in progress")]
    SubmissionInProgress,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("API returned an error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Unit conversion error: {0}")]
    Units(#[from] alloy_primitives::utils::UnitsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnowprintError {
    pub(crate) fn unknown_token(symbol: TokenSymbol, chain: BridgeChain) -> Self {
        Self::UnknownToken {
            symbol: symbol.to_string(),
            chain: chain.to_string(),
        }
    }

    /// Returns the validation error if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnowprintError>;
