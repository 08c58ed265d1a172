//! Chain, network and token configuration
//!
//! This module contains the static network table (chain ids, RPC endpoints,
//! bridge contracts) and the token registry for both environments.

pub(crate) mod addresses;
mod network;
mod tokens;

pub use network::{BridgeChain, Environment, NetworkConfig, NetworkSet};
pub use tokens::{Token, TokenRegistry, TokenSymbol};
