//! Token registry
//!
//! Static token metadata plus a per-environment address book. Address lookup is
//! a total function over [`TokenSymbol`] x [`BridgeChain`]: every pair either
//! resolves or fails with [`SnowprintError::UnknownToken`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::addresses::{
    AVALANCHE_DAI_ADDRESS, AVALANCHE_USDC_ADDRESS, AVALANCHE_USDT_ADDRESS, AVALANCHE_WETH_ADDRESS,
    ETHEREUM_DAI_ADDRESS, ETHEREUM_USDC_ADDRESS, ETHEREUM_USDT_ADDRESS, ETHEREUM_WETH_ADDRESS,
};
use super::network::{BridgeChain, Environment};
use crate::error::{Result, SnowprintError};

/// Tokens the explorer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    Eth,
    Usdt,
    Usdc,
    Dai,
    Weth,
    Wbtc,
    Uni,
    Aave,
    Sushi,
    Link,
    Mkr,
    Comp,
    Snx,
    Bat,
    Yfi,
    Crv,
}

impl TokenSymbol {
    pub const ALL: [TokenSymbol; 16] = [
        TokenSymbol::Eth,
        TokenSymbol::Usdt,
        TokenSymbol::Usdc,
        TokenSymbol::Dai,
        TokenSymbol::Weth,
        TokenSymbol::Wbtc,
        TokenSymbol::Uni,
        TokenSymbol::Aave,
        TokenSymbol::Sushi,
        TokenSymbol::Link,
        TokenSymbol::Mkr,
        TokenSymbol::Comp,
        TokenSymbol::Snx,
        TokenSymbol::Bat,
        TokenSymbol::Yfi,
        TokenSymbol::Crv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
            Self::Usdc => "USDC",
            Self::Dai => "DAI",
            Self::Weth => "WETH",
            Self::Wbtc => "WBTC",
            Self::Uni => "UNI",
            Self::Aave => "AAVE",
            Self::Sushi => "SUSHI",
            Self::Link => "LINK",
            Self::Mkr => "MKR",
            Self::Comp => "COMP",
            Self::Snx => "SNX",
            Self::Bat => "BAT",
            Self::Yfi => "YFI",
            Self::Crv => "CRV",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eth => "Ether",
            Self::Usdt => "Tether",
            Self::Usdc => "USD Coin",
            Self::Dai => "Dai Stablecoin",
            Self::Weth => "Wrapped Ether",
            Self::Wbtc => "Wrapped Bitcoin",
            Self::Uni => "Uniswap",
            Self::Aave => "Aave",
            Self::Sushi => "SushiSwap",
            Self::Link => "Chainlink",
            Self::Mkr => "MakerDAO",
            Self::Comp => "Compound",
            Self::Snx => "Synthetix",
            Self::Bat => "Basic Attention Token",
            Self::Yfi => "Yearn Finance",
            Self::Crv => "Curve Finance",
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Self::Usdt | Self::Usdc => 6,
            Self::Wbtc => 8,
            _ => 18,
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = SnowprintError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|token| token.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SnowprintError::UnknownToken {
                symbol: s.to_string(),
                chain: "any".to_string(),
            })
    }
}

/// A token resolved for one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: TokenSymbol,
    pub chain: BridgeChain,
    pub address: Address,
}

impl Token {
    pub fn name(&self) -> &'static str {
        self.symbol.name()
    }

    pub fn decimals(&self) -> u8 {
        self.symbol.decimals()
    }
}

/// Address book for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistry {
    environment: Environment,
    addresses: HashMap<(TokenSymbol, BridgeChain), Address>,
}

impl TokenRegistry {
    /// An empty registry; every lookup fails until addresses are added.
    pub fn empty(environment: Environment) -> Self {
        Self {
            environment,
            addresses: HashMap::new(),
        }
    }

    /// Registry seeded with the built-in mainnet addresses.
    ///
    /// Testnet has no built-in addresses.
    pub fn with_defaults(environment: Environment) -> Self {
        let mut registry = Self::empty(environment);
        if environment == Environment::Mainnet {
            for (symbol, chain, address) in [
                (TokenSymbol::Weth, BridgeChain::Ethereum, ETHEREUM_WETH_ADDRESS),
                (TokenSymbol::Usdc, BridgeChain::Ethereum, ETHEREUM_USDC_ADDRESS),
                (TokenSymbol::Usdt, BridgeChain::Ethereum, ETHEREUM_USDT_ADDRESS),
                (TokenSymbol::Dai, BridgeChain::Ethereum, ETHEREUM_DAI_ADDRESS),
                (TokenSymbol::Weth, BridgeChain::Avalanche, AVALANCHE_WETH_ADDRESS),
                (TokenSymbol::Usdc, BridgeChain::Avalanche, AVALANCHE_USDC_ADDRESS),
                (TokenSymbol::Usdt, BridgeChain::Avalanche, AVALANCHE_USDT_ADDRESS),
                (TokenSymbol::Dai, BridgeChain::Avalanche, AVALANCHE_DAI_ADDRESS),
            ] {
                registry.insert(symbol, chain, address);
            }
        }
        registry
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Sets or replaces an address. The zero address is treated as unset.
    pub fn insert(&mut self, symbol: TokenSymbol, chain: BridgeChain, address: Address) {
        if address.is_zero() {
            self.addresses.remove(&(symbol, chain));
        } else {
            self.addresses.insert((symbol, chain), address);
        }
    }

    pub fn with_address(mut self, symbol: TokenSymbol, chain: BridgeChain, address: Address) -> Self {
        self.insert(symbol, chain, address);
        self
    }

    /// Contract address of `symbol` on `chain`.
    pub fn address(&self, symbol: TokenSymbol, chain: BridgeChain) -> Result<Address> {
        self.addresses
            .get(&(symbol, chain))
            .copied()
            .ok_or_else(|| SnowprintError::unknown_token(symbol, chain))
    }

    pub fn resolve(&self, symbol: TokenSymbol, chain: BridgeChain) -> Result<Token> {
        Ok(Token {
            symbol,
            chain,
            address: self.address(symbol, chain)?,
        })
    }

    /// Tokens with an address on `chain`, in declaration order.
    pub fn available_on(&self, chain: BridgeChain) -> Vec<TokenSymbol> {
        TokenSymbol::ALL
            .into_iter()
            .filter(|symbol| self.addresses.contains_key(&(*symbol, chain)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_decimals() {
        assert_eq!(TokenSymbol::Usdc.decimals(), 6);
        assert_eq!(TokenSymbol::Usdt.decimals(), 6);
        assert_eq!(TokenSymbol::Wbtc.decimals(), 8);
        assert_eq!(TokenSymbol::Dai.decimals(), 18);
    }

    #[test]
    fn test_symbol_round_trip() {
        for symbol in TokenSymbol::ALL {
            assert_eq!(symbol.as_str().parse::<TokenSymbol>().unwrap(), symbol);
        }
        assert_eq!("usdc".parse::<TokenSymbol>().unwrap(), TokenSymbol::Usdc);
    }

    #[test]
    fn test_unknown_symbol() {
        let err = "DOGE".parse::<TokenSymbol>().unwrap_err();
        assert!(matches!(err, SnowprintError::UnknownToken { symbol, .. } if symbol == "DOGE"));
    }

    #[test]
    fn test_mainnet_defaults_resolve() {
        let registry = TokenRegistry::with_defaults(Environment::Mainnet);
        let usdc = registry
            .resolve(TokenSymbol::Usdc, BridgeChain::Avalanche)
            .unwrap();
        assert_eq!(usdc.address, AVALANCHE_USDC_ADDRESS);
        assert_eq!(usdc.decimals(), 6);
        assert_eq!(
            registry.available_on(BridgeChain::Ethereum),
            vec![
                TokenSymbol::Usdt,
                TokenSymbol::Usdc,
                TokenSymbol::Dai,
                TokenSymbol::Weth
            ]
        );
    }

    #[test]
    fn test_unset_address_is_unknown_token() {
        let registry = TokenRegistry::with_defaults(Environment::Testnet);
        let err = registry
            .address(TokenSymbol::Usdc, BridgeChain::Avalanche)
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Unknown token USDC on avalanche");
    }

    #[test]
    fn test_zero_address_clears_entry() {
        let token = address!("1111111111111111111111111111111111111111");
        let mut registry = TokenRegistry::empty(Environment::Testnet)
            .with_address(TokenSymbol::Link, BridgeChain::Avalanche, token);
        assert_eq!(
            registry
                .address(TokenSymbol::Link, BridgeChain::Avalanche)
                .unwrap(),
            token
        );

        registry.insert(TokenSymbol::Link, BridgeChain::Avalanche, Address::ZERO);
        assert!(registry
            .address(TokenSymbol::Link, BridgeChain::Avalanche)
            .is_err());
    }
}
