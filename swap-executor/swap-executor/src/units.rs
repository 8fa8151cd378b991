//! Conversion between whole-unit decimal amounts and atomic token units
//!
//! Amounts are routed through `BigDecimal` via their shortest decimal
//! representation, so `4275.67` is treated as exactly `4275.67` rather than
//! its nearest binary float

use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::{
    num_bigint::{BigInt, Sign},
    BigDecimal,
};

use crate::error::SwapError;

/// Parse a float amount into an exact decimal
fn to_decimal(amount: f64) -> Result<BigDecimal, SwapError> {
    if !amount.is_finite() || amount < 0. {
        return Err(SwapError::invalid_amount(format!("{amount} is not a valid amount")));
    }

    BigDecimal::from_str(&amount.to_string()).map_err(SwapError::invalid_amount)
}

/// `10^decimals` as a decimal
fn unit(decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), -i64::from(decimals))
}

/// Scale a whole-unit decimal to atoms, truncating toward zero
fn decimal_to_atoms(amount: &BigDecimal, decimals: u8) -> Result<U256, SwapError> {
    let scaled = amount * unit(decimals);

    // The scale is zero after truncation, so the bigint is the atom count
    let (atoms, _) = scaled.with_scale(0).into_bigint_and_scale();
    U256::try_from(atoms).map_err(SwapError::invalid_amount)
}

/// Convert a whole-unit amount to atoms at the given precision
pub fn to_atoms(amount: f64, decimals: u8) -> Result<U256, SwapError> {
    decimal_to_atoms(&to_decimal(amount)?, decimals)
}

/// The minimum acceptable output of a swap, in atoms
///
/// Computes `floor(amount_to * (1 - tolerance))` at the given precision
pub fn minimum_output(amount_to: f64, tolerance: f64, decimals: u8) -> Result<U256, SwapError> {
    let amount = to_decimal(amount_to)?;
    let tolerance = to_decimal(tolerance)?;
    let retained = BigDecimal::from(1) - tolerance;

    decimal_to_atoms(&(amount * retained), decimals)
}

/// Convert an atom count to a whole-unit decimal at the given precision
pub fn format_units(atoms: U256, decimals: u8) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &atoms.to_be_bytes::<32>());
    BigDecimal::new(digits, i64::from(decimals))
}

/// Render a decimal with exactly `places` fractional digits
pub fn format_fixed(value: &BigDecimal, places: u32) -> String {
    let places_i64 = i64::from(places);
    let (digits, _) = value.round(places_i64).with_scale(places_i64).into_bigint_and_scale();

    let sign = if digits.sign() == Sign::Minus { "-" } else { "" };
    let digits = digits.magnitude().to_string();
    let width = places as usize + 1;
    let padded = format!("{digits:0>width$}");
    let (int_part, frac_part) = padded.split_at(padded.len() - places as usize);

    if places == 0 {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}
