//! Environment-driven configuration
//!
//! Every setting has a built-in default; `SNOWPRINT_*` variables override
//! them. [`SnowprintConfig::from_env`] also loads a `.env` file if present.
//!
//! | Key | Default |
//! |---|---|
//! | `SNOWPRINT_NETWORK` | `testnet` |
//! | `SNOWPRINT_API_URL` | `http://localhost:3001` |
//! | `SNOWPRINT_{CHAIN}_RPC_{ENV}` | public RPC endpoint |
//! | `SNOWPRINT_{CHAIN}_BRIDGE_{ENV}` | built-in bridge contract |
//! | `SNOWPRINT_{SYMBOL}_ADDRESS_{CHAIN}_{ENV}` | built-in token address, if any |
//! | `SNOWPRINT_POLL_INTERVAL_SECS` | `10` |
//! | `SNOWPRINT_SNOWTRACE_URL` | `https://api.snowtrace.io/api` |
//! | `SNOWPRINT_SNOWTRACE_API_KEY`, else `SNOWTRACE_API_KEY` | unset |

use std::time::Duration;

use alloy_primitives::Address;
use tracing::debug;
use url::Url;

use crate::chain::{BridgeChain, Environment, NetworkConfig, NetworkSet, TokenRegistry, TokenSymbol};
use crate::error::{Result, SnowprintError};
use crate::poller::{clamp_interval, DEFAULT_POLL_INTERVAL};
use crate::providers::{DEFAULT_API_URL, DEFAULT_SNOWTRACE_URL};

const PREFIX: &str = "SNOWPRINT";

/// Resolved client configuration.
#[derive(Clone)]
pub struct SnowprintConfig {
    pub environment: Environment,
    pub api_url: Url,
    pub networks: NetworkSet,
    pub tokens: TokenRegistry,
    pub poll_interval: Duration,
    pub snowtrace_url: Url,
    pub snowtrace_api_key: Option<String>,
}

impl std::fmt::Debug for SnowprintConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowprintConfig")
            .field("environment", &self.environment)
            .field("api_url", &self.api_url)
            .field("networks", &self.networks)
            .field("tokens", &self.tokens)
            .field("poll_interval", &self.poll_interval)
            .field("snowtrace_url", &self.snowtrace_url)
            .field(
                "snowtrace_api_key",
                &self.snowtrace_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl SnowprintConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), event = "dotenv_loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`SnowprintError::InvalidConfig`] or [`SnowprintError::InvalidUrl`]
    /// for values that do not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match get(&format!("{PREFIX}_NETWORK")) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        let api_url = parse_url(
            "API",
            &get(&format!("{PREFIX}_API_URL")).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let network = |chain: BridgeChain| -> Result<NetworkConfig> {
            let defaults = NetworkConfig::default_for(chain, environment)?;
            let rpc_url = match get(&chain_key(chain, "RPC", environment)) {
                Some(raw) => parse_url("RPC", &raw)?,
                None => defaults.rpc_url().clone(),
            };
            let bridge_address = match get(&chain_key(chain, "BRIDGE", environment)) {
                Some(raw) => parse_address(&raw)?,
                None => defaults.bridge_address(),
            };

            Ok(NetworkConfig::builder()
                .chain(chain)
                .environment(environment)
                .rpc_url(rpc_url)
                .explorer_url(defaults.explorer_url().clone())
                .bridge_address(bridge_address)
                .build())
        };
        let networks = NetworkSet::new(
            network(BridgeChain::Ethereum)?,
            network(BridgeChain::Avalanche)?,
        )?;

        let mut tokens = TokenRegistry::with_defaults(environment);
        for symbol in TokenSymbol::ALL {
            for chain in BridgeChain::ALL {
                if let Some(raw) = get(&token_key(symbol, chain, environment)) {
                    tokens.insert(symbol, chain, parse_address(&raw)?);
                }
            }
        }

        let poll_interval = match get(&format!("{PREFIX}_POLL_INTERVAL_SECS")) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    SnowprintError::InvalidConfig(format!("invalid poll interval: {raw}"))
                })?;
                clamp_interval(Duration::from_secs(secs))
            }
            None => DEFAULT_POLL_INTERVAL,
        };

        let snowtrace_url = parse_url(
            "Snowtrace",
            &get(&format!("{PREFIX}_SNOWTRACE_URL"))
                .unwrap_or_else(|| DEFAULT_SNOWTRACE_URL.to_string()),
        )?;
        let snowtrace_api_key = get(&format!("{PREFIX}_SNOWTRACE_API_KEY"))
            .or_else(|| get("SNOWTRACE_API_KEY"))
            .map(|key| key.trim().to_string());

        debug!(
            environment = %environment,
            api_url = %api_url,
            poll_interval_secs = poll_interval.as_secs(),
            snowtrace_api_key_set = snowtrace_api_key.is_some(),
            event = "config_loaded"
        );

        Ok(Self {
            environment,
            api_url,
            networks,
            tokens,
            poll_interval,
            snowtrace_url,
            snowtrace_api_key,
        })
    }
}

fn chain_key(chain: BridgeChain, kind: &str, environment: Environment) -> String {
    format!(
        "{PREFIX}_{}_{kind}_{}",
        chain.to_string().to_uppercase(),
        environment.to_string().to_uppercase()
    )
}

fn token_key(symbol: TokenSymbol, chain: BridgeChain, environment: Environment) -> String {
    format!(
        "{PREFIX}_{}_ADDRESS_{}_{}",
        symbol.as_str(),
        chain.to_string().to_uppercase(),
        environment.to_string().to_uppercase()
    )
}

fn parse_url(what: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| SnowprintError::InvalidUrl {
        reason: format!("Invalid {what} URL {raw:?}: {e}"),
    })
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse()
        .map_err(|e| SnowprintError::InvalidConfig(format!("invalid address {raw:?}: {e}")))
}
