use alloy_primitives::U256;

use crate::error::Result;
use crate::units::{from_base_units, NATIVE_DECIMALS};

/// Fee estimate for one approve-then-bridge submission, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    pub gas_price: u128,
    pub gas_units: u64,
    pub gas_cost: U256,
    /// Native fee paid to the bridge contract.
    pub bridge_fee: U256,
    pub total: U256,
}

impl FeeEstimate {
    pub(crate) fn new(gas_price: u128, gas_units: u64, bridge_fee: U256) -> Self {
        let gas_cost = U256::from(gas_price) * U256::from(gas_units);
        Self {
            gas_price,
            gas_units,
            gas_cost,
            bridge_fee,
            total: gas_cost + bridge_fee,
        }
    }

    /// Total in native units, e.g. `"0.0165"`.
    pub fn formatted_total(&self) -> Result<String> {
        from_base_units(self.total, NATIVE_DECIMALS)
    }
}
