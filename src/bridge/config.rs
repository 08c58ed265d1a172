use alloy_primitives::U256;
use bon::Builder;

/// Native fee attached to every `bridge` call: 0.01 of the native currency.
pub const DEFAULT_BRIDGE_FEE_WEI: u64 = 10_000_000_000_000_000;

/// Gas budgeted for the ERC-20 `approve` transaction.
pub const DEFAULT_APPROVE_GAS: u64 = 60_000;

/// Gas budgeted for the payable `bridge` transaction.
pub const DEFAULT_BRIDGE_GAS: u64 = 200_000;

/// How fees are estimated before a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeeModel {
    /// Gas price times a fixed gas budget, plus the fixed native bridge fee.
    #[default]
    GasBudget,
    /// The bridge contract's `estimateFee` quote, plus gas cost.
    ContractQuote,
}

/// Configuration for confirmation polling.
///
/// Controls how long the orchestrator waits for the approve and bridge
/// transactions to be mined.
///
/// # Examples
///
/// ```rust
/// use snowprint::PollingConfig;
///
/// // Use defaults (90 attempts, 2 second intervals)
/// let config = PollingConfig::default();
///
/// let config = PollingConfig::default()
///     .with_max_attempts(20)
///     .with_poll_interval_secs(5);
/// assert_eq!(config.total_timeout_secs(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of receipt lookups before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between receipt lookups.
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    /// - `max_attempts`: 90
    /// - `poll_interval_secs`: 2
    ///
    /// Three minutes comfortably covers C-Chain finality and a congested
    /// Ethereum block.
    fn default() -> Self {
        Self {
            max_attempts: 90,
            poll_interval_secs: 2,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Returns the total maximum wait time in seconds.
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

/// Tunables of a [`BridgeOrchestrator`](crate::BridgeOrchestrator).
///
/// ```rust
/// use snowprint::{BridgeConfig, FeeModel};
///
/// let config = BridgeConfig::builder()
///     .fee_model(FeeModel::ContractQuote)
///     .build();
/// assert_eq!(config.approve_gas, 60_000);
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    #[builder(default)]
    pub fee_model: FeeModel,
    /// Value attached to the `bridge` call, in wei.
    #[builder(default = U256::from(DEFAULT_BRIDGE_FEE_WEI))]
    pub bridge_fee: U256,
    #[builder(default = DEFAULT_APPROVE_GAS)]
    pub approve_gas: u64,
    #[builder(default = DEFAULT_BRIDGE_GAS)]
    pub bridge_gas: u64,
    #[builder(default)]
    pub polling: PollingConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BridgeConfig {
    /// Gas units budgeted for one approve-then-bridge submission.
    pub fn gas_budget(&self) -> u64 {
        self.approve_gas + self.bridge_gas
    }
}
