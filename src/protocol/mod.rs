//! Wire types
//!
//! JSON shapes served by the explorer backend and the Snowtrace stats API,
//! and the transfer status codes reported by the bridge contract.

mod explorer;
mod health;
mod transfer_status;

pub use explorer::{
    BaseResponse, Block, CrossChainKind, CrossChainStatus, CrossChainTx, NetworkStats, Proposal,
    ProposalStatus, ProposalsResponse, Transaction,
};
pub(crate) use health::latency_millis;
pub use health::{EcosystemHealth, StatsResponse, ValidatorHealth};
pub use transfer_status::TransferStatus;
