//! Local pre-flight checks
//!
//! Checks that need nothing but the request itself. They run first and never
//! reach the provider.

use alloy_primitives::U256;

use super::request::BridgeRequest;
use crate::error::{Result, ValidationError};
use crate::units::to_base_units;

/// Rejects same-chain requests and parses the amount into base units.
///
/// A zero amount is rejected alongside malformed input.
pub(crate) fn check_request(request: &BridgeRequest) -> Result<U256> {
    if request.source_chain() == request.destination_chain() {
        return Err(ValidationError::SameChain.into());
    }

    let amount = to_base_units(request.amount(), request.token().decimals())?;
    if amount.is_zero() {
        return Err(ValidationError::InvalidAmount {
            input: request.amount().to_string(),
        }
        .into());
    }

    Ok(amount)
}

pub(crate) fn check_balance(amount: U256, balance: U256) -> Result<()> {
    if amount > balance {
        return Err(ValidationError::InsufficientBalance {
            requested: amount,
            available: balance,
        }
        .into());
    }
    Ok(())
}

pub(crate) fn check_limits(amount: U256, min: U256, max: U256) -> Result<()> {
    if amount < min || amount > max {
        return Err(ValidationError::AmountOutOfRange { amount, min, max }.into());
    }
    Ok(())
}

pub(crate) fn check_network(expected: u64, actual: u64) -> Result<()> {
    if expected != actual {
        return Err(ValidationError::WrongNetwork { expected, actual }.into());
    }
    Ok(())
}
