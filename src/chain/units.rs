//! Conversion between the smallest indivisible unit of a currency (wei) and
//! its decimal display form (ether).
//!
//! Both directions are exact: no rounding is ever applied, the display form
//! only drops the trailing zeros of the fractional part.

use crate::error::UnitsError;
use alloy_primitives::U256;

/// number of decimals of the native currency of every EVM chain we support
pub const ETHER_DECIMALS: u8 = 18;

/// format `amount` (in the smallest unit) shifted by `decimals` places.
///
/// ```
/// # use evm_wallet_connector::chain::units::format_units;
/// # use alloy_primitives::U256;
/// assert_eq!(format_units(U256::from(2_500_000u64), 6), "2.5");
/// assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
/// ```
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);

    if decimals == 0 {
        return digits;
    }

    let digits = if digits.len() <= decimals {
        format!("{digits:0>width$}", width = decimals + 1)
    } else {
        digits
    };

    let (integer, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_owned()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// parse a decimal display amount into the smallest unit.
///
/// Accepts `"1"`, `"1.5"`, `".5"` and `"1."`. Rejects signs, exponents,
/// grouping separators and more fractional digits than `decimals`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if integer.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Empty);
    }

    if let Some(c) = integer
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(UnitsError::InvalidDigit(c));
    }

    if fraction.len() > usize::from(decimals) {
        return Err(UnitsError::TooManyDecimals {
            found: fraction.len(),
            max: decimals,
        });
    }

    let digits = format!(
        "{integer}{fraction:0<width$}",
        width = usize::from(decimals)
    );
    let digits = digits.trim_start_matches('0');

    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10).map_err(|_| UnitsError::Overflow)
}

pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

pub fn parse_ether(ether: &str) -> Result<U256, UnitsError> {
    parse_units(ether, ETHER_DECIMALS)
}
