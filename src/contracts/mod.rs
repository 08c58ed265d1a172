//! Contract bindings
//!
//! Fixed ABI fragments for the ERC-20 token and the bridge contract, encoded
//! with `alloy-sol-types` and executed through a [`ChainProvider`](crate::ChainProvider).
//!
//! - [`Erc20Contract`](erc20::Erc20Contract): `approve`, `balanceOf`
//! - [`BridgeContract`](bridge::BridgeContract): `bridge`, `isPaused`,
//!   `getMinAmount`, `getMaxAmount`, `estimateFee`, `getTransactionStatus`

pub mod bridge;
pub mod erc20;
