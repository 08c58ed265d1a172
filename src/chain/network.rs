//! Logical networks and their per-environment configuration
//!
//! The explorer bridges between two logical chains, each of which exists on a
//! mainnet and a testnet. [`BridgeChain`] and [`Environment`] together resolve
//! the concrete [`NamedChain`], chain id, RPC endpoint and bridge contract.

use std::fmt;
use std::str::FromStr;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};
use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use super::addresses::{BRIDGE_ADDRESS_MAINNET, BRIDGE_ADDRESS_TESTNET};
use crate::error::{Result, SnowprintError};

/// A chain the bridge can move tokens between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeChain {
    Ethereum,
    Avalanche,
}

impl BridgeChain {
    pub const ALL: [BridgeChain; 2] = [BridgeChain::Ethereum, BridgeChain::Avalanche];

    /// Human-readable chain name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Avalanche => "Avalanche",
        }
    }

    /// Resolves the concrete chain for an environment.
    pub fn named_chain(&self, environment: Environment) -> NamedChain {
        match (self, environment) {
            (Self::Ethereum, Environment::Mainnet) => NamedChain::Mainnet,
            (Self::Ethereum, Environment::Testnet) => NamedChain::Goerli,
            (Self::Avalanche, Environment::Mainnet) => NamedChain::Avalanche,
            (Self::Avalanche, Environment::Testnet) => NamedChain::AvalancheFuji,
        }
    }

    /// EIP-155 chain id for an environment.
    pub fn chain_id(&self, environment: Environment) -> u64 {
        self.named_chain(environment) as u64
    }

    /// Finds the chain and environment a chain id belongs to.
    pub fn from_chain_id(chain_id: u64) -> Option<(BridgeChain, Environment)> {
        Self::ALL.into_iter().find_map(|chain| {
            Environment::ALL
                .into_iter()
                .find(|env| chain.chain_id(*env) == chain_id)
                .map(|env| (chain, env))
        })
    }

    fn default_rpc_url(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (Self::Ethereum, Environment::Mainnet) => "https://eth.llamarpc.com",
            (Self::Ethereum, Environment::Testnet) => "https://rpc.ankr.com/eth_goerli",
            (Self::Avalanche, Environment::Mainnet) => "https://api.avax.network/ext/bc/C/rpc",
            (Self::Avalanche, Environment::Testnet) => {
                "https://api.avax-test.network/ext/bc/C/rpc"
            }
        }
    }

    fn default_explorer_url(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (Self::Ethereum, Environment::Mainnet) => "https://etherscan.io",
            (Self::Ethereum, Environment::Testnet) => "https://goerli.etherscan.io",
            (Self::Avalanche, Environment::Mainnet) => "https://snowtrace.io",
            (Self::Avalanche, Environment::Testnet) => "https://testnet.snowtrace.io",
        }
    }
}

impl fmt::Display for BridgeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "ethereum"),
            Self::Avalanche => write!(f, "avalanche"),
        }
    }
}

impl FromStr for BridgeChain {
    type Err = SnowprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" => Ok(Self::Ethereum),
            "avalanche" => Ok(Self::Avalanche),
            other => Err(SnowprintError::InvalidConfig(format!(
                "unsupported chain: {other}"
            ))),
        }
    }
}

/// Active network selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    #[default]
    Testnet,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Mainnet, Environment::Testnet];

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Environment {
    type Err = SnowprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(SnowprintError::InvalidConfig(format!(
                "unknown network selector: {other} (expected mainnet or testnet)"
            ))),
        }
    }
}

/// Connection details for one chain in one environment.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    chain: BridgeChain,
    environment: Environment,
    rpc_url: Url,
    explorer_url: Url,
    bridge_address: Address,
}

impl NetworkConfig {
    /// Built-in configuration for a chain.
    pub fn default_for(chain: BridgeChain, environment: Environment) -> Result<Self> {
        let bridge_address = match environment {
            Environment::Mainnet => BRIDGE_ADDRESS_MAINNET,
            Environment::Testnet => BRIDGE_ADDRESS_TESTNET,
        };

        Ok(Self {
            chain,
            environment,
            rpc_url: parse_url(chain.default_rpc_url(environment))?,
            explorer_url: parse_url(chain.default_explorer_url(environment))?,
            bridge_address,
        })
    }

    pub fn chain(&self) -> BridgeChain {
        self.chain
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Chain id derived from chain and environment, so it is unique per config.
    pub fn chain_id(&self) -> u64 {
        self.chain.chain_id(self.environment)
    }

    pub fn named_chain(&self) -> NamedChain {
        self.chain.named_chain(self.environment)
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub fn explorer_url(&self) -> &Url {
        &self.explorer_url
    }

    pub fn bridge_address(&self) -> Address {
        self.bridge_address
    }

    /// Block explorer link for a transaction.
    pub fn explorer_tx_url(&self, tx_hash: TxHash) -> Result<Url> {
        self.explorer_url
            .join(&format!("/tx/{tx_hash}"))
            .map_err(|e| SnowprintError::InvalidUrl {
                reason: format!("Failed to construct explorer URL: {e}"),
            })
    }
}

/// Both bridge chains for the active environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSet {
    ethereum: NetworkConfig,
    avalanche: NetworkConfig,
}

impl NetworkSet {
    pub fn new(ethereum: NetworkConfig, avalanche: NetworkConfig) -> Result<Self> {
        if ethereum.chain() != BridgeChain::Ethereum || avalanche.chain() != BridgeChain::Avalanche
        {
            return Err(SnowprintError::InvalidConfig(
                "network set requires one ethereum and one avalanche config".to_string(),
            ));
        }
        if ethereum.environment() != avalanche.environment() {
            return Err(SnowprintError::InvalidConfig(
                "network configs must share an environment".to_string(),
            ));
        }
        Ok(Self {
            ethereum,
            avalanche,
        })
    }

    /// Built-in configuration for both chains.
    pub fn defaults(environment: Environment) -> Result<Self> {
        Self::new(
            NetworkConfig::default_for(BridgeChain::Ethereum, environment)?,
            NetworkConfig::default_for(BridgeChain::Avalanche, environment)?,
        )
    }

    pub fn environment(&self) -> Environment {
        self.ethereum.environment()
    }

    pub fn get(&self, chain: BridgeChain) -> &NetworkConfig {
        match chain {
            BridgeChain::Ethereum => &self.ethereum,
            BridgeChain::Avalanche => &self.avalanche,
        }
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| SnowprintError::InvalidUrl {
        reason: format!("{raw}: {e}"),
    })
}
