//! Decimal amount <-> base unit conversion
//!
//! Amounts arrive as user-typed decimal strings ("1.5") and leave as integer
//! base units scaled by `10^decimals`, which is what token contracts expect.
//! Conversion is strict: anything that is not a plain non-negative decimal
//! with at most `decimals` fractional digits is rejected before a chain call
//! can happen.

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;

use crate::error::{Result, SnowprintError, ValidationError};

/// Decimals of the native currency (ETH, AVAX) on every supported chain.
pub const NATIVE_DECIMALS: u8 = 18;

/// Converts a decimal string into base units for a token with `decimals`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAmount`] for empty, signed, non-numeric or
/// over-precise input.
///
/// # Example
///
/// ```rust
/// use snowprint::units::to_base_units;
/// use alloy_primitives::U256;
///
/// assert_eq!(to_base_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
/// ```
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = || {
        SnowprintError::from(ValidationError::InvalidAmount {
            input: amount.to_string(),
        })
    };

    if !is_plain_decimal(trimmed, decimals) {
        return Err(invalid());
    }

    let mut normalized = trimmed.trim_end_matches('.').to_string();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }

    match parse_units(&normalized, decimals).map_err(|_| invalid())? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(invalid()),
    }
}

/// Formats base units as a decimal string, trimming trailing zeros.
///
/// Whole amounts keep a single fractional zero (`"1.0"`).
pub fn from_base_units(amount: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(amount, decimals)?;
    Ok(trim_fraction(formatted))
}

fn is_plain_decimal(input: &str, decimals: u8) -> bool {
    let (integer, fraction) = match input.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (input, None),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if !digits(integer) {
        return false;
    }

    match fraction {
        None => !integer.is_empty(),
        Some(fraction) => {
            digits(fraction)
                && !(integer.is_empty() && fraction.is_empty())
                && fraction.len() <= decimals as usize
        }
    }
}

fn trim_fraction(mut formatted: String) -> String {
    if formatted.contains('.') {
        let trimmed_len = formatted.trim_end_matches('0').len();
        formatted.truncate(trimmed_len);
        if formatted.ends_with('.') {
            formatted.push('0');
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_one_and_a_half_usdc() {
        let base = to_base_units("1.5", 6).unwrap();
        assert_eq!(base, U256::from(1_500_000u64));
        assert_eq!(from_base_units(base, 6).unwrap(), "1.5");
    }

    #[test]
    fn test_whole_amount_formats_with_single_zero() {
        let base = to_base_units("10", 18).unwrap();
        assert_eq!(base, U256::from(10u64) * U256::from(10u64).pow(U256::from(18)));
        assert_eq!(from_base_units(base, 18).unwrap(), "10.0");
    }

    #[test]
    fn test_leading_dot_is_accepted() {
        assert_eq!(to_base_units(".25", 2).unwrap(), U256::from(25u64));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(to_base_units(" 2 ", 0).unwrap(), U256::from(2u64));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-5")]
    #[case("+5")]
    #[case("1.2.3")]
    #[case(".")]
    #[case("1e6")]
    #[case("NaN")]
    #[case("inf")]
    #[case("1.1234567")]
    fn test_rejects_invalid_input(#[case] input: &str) {
        let err = to_base_units(input, 6).unwrap_err();
        assert!(
            matches!(
                err,
                SnowprintError::Validation(ValidationError::InvalidAmount { .. })
            ),
            "unexpected error for {input:?}: {err}"
        );
    }

    #[test]
    fn test_native_fee_formatting() {
        let fee = to_base_units("0.01", NATIVE_DECIMALS).unwrap();
        insta::assert_snapshot!(fee.to_string(), @"10000000000000000");
        insta::assert_snapshot!(from_base_units(fee, NATIVE_DECIMALS).unwrap(), @"0.01");
    }
}
