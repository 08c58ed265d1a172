// SPDX-FileCopyrightText: 2025 Snowprint Contributors
//
// SPDX-License-Identifier: Apache-2.0
//! Contract addresses known at build time
//!
//! Bridge contract and well-known ERC-20 token addresses. Everything here can be
//! overridden through [`SnowprintConfig`](crate::SnowprintConfig); testnet
//! tokens have no built-in addresses and must be configured.

use alloy_primitives::{address, Address};

// Bridge Addresses

/// Bridge contract used by the explorer's bridge form on mainnet.
pub const BRIDGE_ADDRESS_MAINNET: Address = address!("50Ff3B278fCC70ec7A9465063d68029AB460eA04");

/// Bridge contract deployed on Goerli and Fuji.
pub const BRIDGE_ADDRESS_TESTNET: Address = address!("50006BDf00000000000000000000000000000000");

// Ethereum Mainnet Tokens

/// <https://etherscan.io/address/0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2>
pub const ETHEREUM_WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// <https://etherscan.io/address/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48>
pub const ETHEREUM_USDC_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// <https://etherscan.io/address/0xdAC17F958D2ee523a2206206994597C13D831ec7>
pub const ETHEREUM_USDT_ADDRESS: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

/// <https://etherscan.io/address/0x6B175474E89094C44Da98b954EedeAC495271d0F>
pub const ETHEREUM_DAI_ADDRESS: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

// Avalanche C-Chain Tokens

/// <https://snowtrace.io/address/0x49D5c2BdFfac6CE2BFdB6640F4F80f226bc10bAB>
pub const AVALANCHE_WETH_ADDRESS: Address = address!("49D5c2BdFfac6CE2BFdB6640F4F80f226bc10bAB");

/// <https://snowtrace.io/address/0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E>
pub const AVALANCHE_USDC_ADDRESS: Address = address!("B97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E");

/// <https://snowtrace.io/address/0x9702230A8Ea53601f5cD2dc00fDBc13d4dF4A8c7>
pub const AVALANCHE_USDT_ADDRESS: Address = address!("9702230A8Ea53601f5cD2dc00fDBc13d4dF4A8c7");

/// <https://snowtrace.io/address/0xd586E7F844cEa2F87f50152665BCbc2C279D8d70>
pub const AVALANCHE_DAI_ADDRESS: Address = address!("d586E7F844cEa2F87f50152665BCbc2C279D8d70");
