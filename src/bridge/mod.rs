//! Token bridge flow
//!
//! Validation, fee estimation and the approve-then-bridge state machine.

mod config;
mod fee;
mod orchestrator;
mod request;
mod state;
mod validation;

pub use config::{
    BridgeConfig, FeeModel, PollingConfig, DEFAULT_APPROVE_GAS, DEFAULT_BRIDGE_FEE_WEI,
    DEFAULT_BRIDGE_GAS,
};
pub use fee::FeeEstimate;
pub use orchestrator::BridgeOrchestrator;
pub use request::{BridgeRequest, TransactionResult, ValidatedTransfer};
pub use state::BridgeTransactionState;
