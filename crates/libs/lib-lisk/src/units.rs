//! # Token Unit Conversion
//!
//! Exact conversion between human-readable decimal strings and base-unit
//! `U256` values (wei-style). Implemented as integer string arithmetic so no
//! precision is lost at any token scale; `rust_decimal` bridges exist for the
//! position-math layer, which never needs more than 28 significant digits.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ChainError, Result};

/// Parse a decimal string into base units.
///
/// `parse_units("100.5", 6)` → `100_500_000`. Rejects negative values,
/// non-numeric input and amounts with more fractional digits than the token
/// carries (silent truncation would lose dust).
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let s = amount.trim();
    if s.is_empty() {
        return Err(ChainError::InvalidAmount("empty amount".to_string()));
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ChainError::InvalidAmount(format!("not a number: {}", amount)));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ChainError::InvalidAmount(format!("not a number: {}", amount)));
    }
    if frac_part.len() > decimals as usize {
        return Err(ChainError::InvalidAmount(format!(
            "too many decimal places ({} > {})",
            frac_part.len(),
            decimals
        )));
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..decimals as usize {
        digits.push('0');
    }

    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };

    U256::from_str_radix(digits, 10)
        .map_err(|_| ChainError::InvalidAmount(format!("amount too large: {}", amount)))
}

/// Format base units as a decimal string, trailing zeros trimmed.
///
/// `format_units(U256::from(100_500_000u64), 6)` → `"100.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let d = decimals as usize;
    let raw = value.to_string();
    if d == 0 {
        return raw;
    }

    let (int_str, frac_str) = if raw.len() > d {
        let (i, f) = raw.split_at(raw.len() - d);
        (i.to_string(), f.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", raw, width = d))
    };

    let frac_trimmed = frac_str.trim_end_matches('0');
    if frac_trimmed.is_empty() {
        int_str
    } else {
        format!("{}.{}", int_str, frac_trimmed)
    }
}

/// Convert a non-negative `Decimal` into base units.
///
/// The decimal is normalized first, so `79.600` parses like `79.6`. Callers
/// round to the token's precision before converting.
pub fn decimal_to_units(value: Decimal, decimals: u8) -> Result<U256> {
    if value.is_sign_negative() {
        return Err(ChainError::InvalidAmount(format!(
            "negative amount: {}",
            value
        )));
    }
    parse_units(&value.normalize().to_string(), decimals)
}

/// Convert base units into a `Decimal` for position math.
///
/// Fails only when the value exceeds `Decimal`'s 28-digit range, which no
/// realistic balance on this deployment does.
pub fn units_to_decimal(value: U256, decimals: u8) -> Result<Decimal> {
    Decimal::from_str(&format_units(value, decimals))
        .map_err(|_| ChainError::InvalidAmount(format!("value exceeds decimal range: {}", value)))
}
