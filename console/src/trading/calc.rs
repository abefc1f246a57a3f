//! # Derived-State Calculator
//!
//! Pure, synchronous functions mapping raw ledger values and user input to
//! display-facing numbers: required margin, slippage-adjusted swap bounds,
//! USD valuations, amount validation. No I/O, no side effects; everything
//! here is deterministic and unit-tested as such.
//!
//! Prices and amounts use [`rust_decimal::Decimal`]; raw ledger quantities
//! stay in `U256` base units and only cross over through
//! `lib_lisk::units`.

use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::time::Duration;
use thiserror::Error;

/// Fraction of a position the borrower must put up as margin.
pub const MARGIN_RATIO: Decimal = dec!(0.20);

/// Maximum leverage the protocol extends (inverse of [`MARGIN_RATIO`]).
pub const MAX_LEVERAGE: u32 = 5;

/// Smallest position the protocol accepts, in USDC.
pub const MIN_POSITION_USDC: Decimal = dec!(1);

/// Largest position the protocol accepts, in USDC.
pub const MAX_POSITION_USDC: Decimal = dec!(100_000);

/// Lowest accepted slippage tolerance, percent.
pub const MIN_SLIPPAGE_PCT: Decimal = dec!(0.01);

/// Highest accepted slippage tolerance, percent.
pub const MAX_SLIPPAGE_PCT: Decimal = dec!(50);

/// Quick-select slippage tolerances offered by the UI, percent.
pub const SLIPPAGE_PRESETS: [Decimal; 3] = [dec!(0.1), dec!(0.5), dec!(1.0)];

/// How long a submitted swap stays valid before the router must reject it.
pub const DEFAULT_SWAP_VALIDITY: Duration = Duration::from_secs(20 * 60);

/// Why an entered amount was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("not a number")]
    NotANumber,
    #[error("below minimum of {0}")]
    BelowMinimum(Decimal),
    #[error("above maximum of {0}")]
    AboveMaximum(Decimal),
}

/// Which step of the approve-then-act sequence comes next.
///
/// Spending writes (create loan, pool deposit) model their allowance
/// precondition as this tagged pair instead of scattered booleans: while
/// `NeedsApproval`, the only action offered is the approve transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPhase {
    /// Current allowance does not cover the request; approve first.
    NeedsApproval,
    /// Allowance covers the request; the spending action may submit.
    ReadyToAct,
}

/// Parse a user- or registry-supplied decimal, tolerating thousands
/// separators and surrounding whitespace.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Margin required for a position entered as a decimal string.
///
/// Tolerant by contract: non-parsable or negative input yields the zero
/// sentinel rather than an error, so it can run on every keystroke.
pub fn margin_required(amount_usd: &str) -> Decimal {
    match parse_decimal(amount_usd) {
        Some(amount) if amount >= Decimal::ZERO => margin_for(amount),
        _ => Decimal::ZERO,
    }
}

/// Margin required for an already-parsed position amount, exact to 2
/// decimal places.
pub fn margin_for(amount: Decimal) -> Decimal {
    (amount * MARGIN_RATIO).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Minimum acceptable output of an exact-input swap.
///
/// `amount_in × (price_in / price_out) × (1 − slippage_pct/100)`, rounded to
/// the output token's precision. Returns zero when either price is absent or
/// non-positive.
pub fn min_amount_out(
    amount_in: Decimal,
    price_in: Option<Decimal>,
    price_out: Option<Decimal>,
    slippage_pct: Decimal,
    out_decimals: u8,
) -> Decimal {
    let (Some(price_in), Some(price_out)) = (price_in, price_out) else {
        return Decimal::ZERO;
    };
    if amount_in <= Decimal::ZERO || price_in <= Decimal::ZERO || price_out <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gross = amount_in * (price_in / price_out);
    let net = gross * (Decimal::ONE - slippage_pct / Decimal::ONE_HUNDRED);
    net.max(Decimal::ZERO)
        .round_dp_with_strategy(u32::from(out_decimals), RoundingStrategy::MidpointAwayFromZero)
}

/// Maximum input an exact-output swap may consume.
///
/// Inverse quote of [`min_amount_out`]:
/// `amount_out × (price_out / price_in) × (1 + slippage_pct/100)`.
pub fn max_amount_in(
    amount_out: Decimal,
    price_in: Option<Decimal>,
    price_out: Option<Decimal>,
    slippage_pct: Decimal,
    in_decimals: u8,
) -> Decimal {
    let (Some(price_in), Some(price_out)) = (price_in, price_out) else {
        return Decimal::ZERO;
    };
    if amount_out <= Decimal::ZERO || price_in <= Decimal::ZERO || price_out <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gross = amount_out * (price_out / price_in);
    let padded = gross * (Decimal::ONE + slippage_pct / Decimal::ONE_HUNDRED);
    padded.round_dp_with_strategy(u32::from(in_decimals), RoundingStrategy::MidpointAwayFromZero)
}

/// USD valuation of a token amount, 2 decimal places; zero when the price is
/// absent.
pub fn usd_value(amount: Decimal, price: Option<Decimal>) -> Decimal {
    match price {
        Some(price) if price > Decimal::ZERO => {
            (amount * price).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        _ => Decimal::ZERO,
    }
}

/// Validate an entered amount against inclusive bounds.
pub fn validate_amount(text: &str, min: Decimal, max: Decimal) -> Result<Decimal, AmountError> {
    let amount = parse_decimal(text).ok_or(AmountError::NotANumber)?;
    if amount < min {
        return Err(AmountError::BelowMinimum(min));
    }
    if amount > max {
        return Err(AmountError::AboveMaximum(max));
    }
    Ok(amount)
}

/// Validate a loan position amount against the protocol bounds.
pub fn validate_position_amount(text: &str) -> Result<Decimal, AmountError> {
    validate_amount(text, MIN_POSITION_USDC, MAX_POSITION_USDC)
}

/// Validate an amount that merely has to be a positive number.
pub fn validate_positive(text: &str) -> Result<Decimal, AmountError> {
    let amount = parse_decimal(text).ok_or(AmountError::NotANumber)?;
    if amount <= Decimal::ZERO {
        return Err(AmountError::BelowMinimum(Decimal::ZERO));
    }
    Ok(amount)
}

/// Validate a slippage tolerance in percent.
pub fn validate_slippage(pct: Decimal) -> Result<(), AmountError> {
    if pct < MIN_SLIPPAGE_PCT {
        return Err(AmountError::BelowMinimum(MIN_SLIPPAGE_PCT));
    }
    if pct > MAX_SLIPPAGE_PCT {
        return Err(AmountError::AboveMaximum(MAX_SLIPPAGE_PCT));
    }
    Ok(())
}

/// Whether `balance` covers `required`, both in base units.
pub fn has_sufficient_balance(balance: U256, required: U256) -> bool {
    balance >= required
}

/// Whether a spending write needs a prior approve.
///
/// Strict: equality means the allowance already covers the request.
pub fn needs_approval(requested: U256, allowance: U256) -> bool {
    requested > allowance
}

/// Classify a request against the current allowance.
pub fn approval_phase(requested: U256, allowance: U256) -> ApprovalPhase {
    if needs_approval(requested, allowance) {
        ApprovalPhase::NeedsApproval
    } else {
        ApprovalPhase::ReadyToAct
    }
}

/// Unix deadline after which the router must reject a swap.
pub fn swap_deadline(now_unix: u64, validity: Duration) -> u64 {
    now_unix.saturating_add(validity.as_secs())
}

/// Display formatting for a token amount.
///
/// Dust below 0.001 keeps 8 decimal places so it stays visible; everything
/// else shows min(6, token decimals).
pub fn format_token_amount(amount: Decimal, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }
    let places = if amount.abs() < dec!(0.001) {
        8
    } else {
        u32::from(decimals.min(6))
    };
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.prec$}", rounded, prec = places as usize)
}

/// Display formatting for a USD value: `$1,234.56`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let magnitude = rounded.abs();
    let text = format!("{:.2}", magnitude);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(int_part);
    if rounded.is_sign_negative() && !magnitude.is_zero() {
        format!("-${}.{}", grouped, frac_part)
    } else {
        format!("${}.{}", grouped, frac_part)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_required_reference_case() {
        assert_eq!(margin_required("1000").to_string(), "200.00");
        assert_eq!(margin_required("1,000").to_string(), "200.00");
    }

    #[test]
    fn test_margin_required_tolerates_bad_input() {
        assert_eq!(margin_required("not a number"), Decimal::ZERO);
        assert_eq!(margin_required(""), Decimal::ZERO);
        assert_eq!(margin_required("-50"), Decimal::ZERO);
    }

    #[test]
    fn test_margin_is_linear_and_monotonic() {
        let amounts = [dec!(0), dec!(1), dec!(99.5), dec!(1000), dec!(100000)];
        let mut prev = Decimal::ZERO;
        for amount in amounts {
            let margin = margin_for(amount);
            assert_eq!(margin, (amount * dec!(0.20)).round_dp(2));
            assert_eq!(margin_for(amount * dec!(2)), margin * dec!(2));
            assert!(margin >= prev);
            prev = margin;
        }
    }

    #[test]
    fn test_margin_ratio_matches_leverage() {
        assert_eq!(MARGIN_RATIO * Decimal::from(MAX_LEVERAGE), Decimal::ONE);
    }

    #[test]
    fn test_min_amount_out_reference_case() {
        // 100 USDC into LSK at 0.5% slippage: 100 × (1.00/1.25) × 0.995
        let out = min_amount_out(dec!(100), Some(dec!(1.00)), Some(dec!(1.25)), dec!(0.5), 18);
        assert_eq!(out, dec!(79.6));
    }

    #[test]
    fn test_min_amount_out_missing_price_is_zero() {
        assert_eq!(min_amount_out(dec!(100), None, Some(dec!(1.25)), dec!(0.5), 18), Decimal::ZERO);
        assert_eq!(min_amount_out(dec!(100), Some(dec!(1.00)), None, dec!(0.5), 18), Decimal::ZERO);
        assert_eq!(
            min_amount_out(dec!(100), Some(dec!(1.00)), Some(Decimal::ZERO), dec!(0.5), 18),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_min_amount_out_non_increasing_in_slippage() {
        let slippages = [dec!(0.01), dec!(0.1), dec!(0.5), dec!(1), dec!(5), dec!(50)];
        let mut prev = Decimal::MAX;
        for slippage in slippages {
            let out = min_amount_out(dec!(100), Some(dec!(1.00)), Some(dec!(1.25)), slippage, 18);
            assert!(out <= prev, "slippage {} raised the bound", slippage);
            prev = out;
        }
    }

    #[test]
    fn test_max_amount_in_non_decreasing_in_slippage() {
        let slippages = [dec!(0.01), dec!(0.5), dec!(1), dec!(10)];
        let mut prev = Decimal::ZERO;
        for slippage in slippages {
            let amount = max_amount_in(dec!(80), Some(dec!(1.00)), Some(dec!(1.25)), slippage, 6);
            assert!(amount >= prev, "slippage {} lowered the input cap", slippage);
            prev = amount;
        }
    }

    #[test]
    fn test_max_amount_in_rounds_to_input_decimals() {
        // 80 LSK out at 0.5% slippage: 80 × 1.25 × 1.005 = 100.5 USDC
        let amount = max_amount_in(dec!(80), Some(dec!(1.00)), Some(dec!(1.25)), dec!(0.5), 6);
        assert_eq!(amount, dec!(100.5));
    }

    #[test]
    fn test_usd_value() {
        assert_eq!(usd_value(dec!(100), Some(dec!(1.25))), dec!(125.00));
        assert_eq!(usd_value(dec!(100), None), Decimal::ZERO);
        assert_eq!(usd_value(dec!(0.333), Some(dec!(3))).to_string(), "1.00");
    }

    #[test]
    fn test_needs_approval_boundary() {
        let allowance = U256::from(500u64);
        assert!(needs_approval(U256::from(501u64), allowance));
        assert!(!needs_approval(U256::from(500u64), allowance));
        assert!(!needs_approval(U256::from(499u64), allowance));

        // Zero allowance needs approval for any request; max covers anything.
        assert!(needs_approval(U256::from(500u64), U256::ZERO));
        assert!(!needs_approval(U256::MAX, U256::MAX));
        assert!(!needs_approval(U256::from(1u64), U256::MAX));
    }

    #[test]
    fn test_approval_phase_tags() {
        assert_eq!(
            approval_phase(U256::from(500u64), U256::ZERO),
            ApprovalPhase::NeedsApproval
        );
        assert_eq!(
            approval_phase(U256::from(500u64), U256::from(500u64)),
            ApprovalPhase::ReadyToAct
        );
    }

    #[test]
    fn test_has_sufficient_balance() {
        assert!(has_sufficient_balance(U256::from(100u64), U256::from(100u64)));
        assert!(!has_sufficient_balance(U256::from(99u64), U256::from(100u64)));
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert_eq!(validate_position_amount("1"), Ok(dec!(1)));
        assert_eq!(validate_position_amount("100000"), Ok(dec!(100000)));
        assert_eq!(
            validate_position_amount("0.5"),
            Err(AmountError::BelowMinimum(dec!(1)))
        );
        assert_eq!(
            validate_position_amount("100001"),
            Err(AmountError::AboveMaximum(dec!(100_000)))
        );
        assert_eq!(validate_position_amount("12x"), Err(AmountError::NotANumber));
    }

    #[test]
    fn test_validate_positive() {
        assert_eq!(validate_positive("0.000001"), Ok(dec!(0.000001)));
        assert!(validate_positive("0").is_err());
        assert!(validate_positive("-3").is_err());
        assert!(validate_positive("abc").is_err());
    }

    #[test]
    fn test_validate_slippage_range() {
        assert_eq!(validate_slippage(dec!(0.01)), Ok(()));
        assert_eq!(validate_slippage(dec!(50)), Ok(()));
        assert!(validate_slippage(dec!(0.005)).is_err());
        assert!(validate_slippage(dec!(50.1)).is_err());
        for preset in SLIPPAGE_PRESETS {
            assert_eq!(validate_slippage(preset), Ok(()));
        }
    }

    #[test]
    fn test_swap_deadline() {
        assert_eq!(swap_deadline(1_700_000_000, DEFAULT_SWAP_VALIDITY), 1_700_001_200);
        assert_eq!(swap_deadline(u64::MAX, DEFAULT_SWAP_VALIDITY), u64::MAX);
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(Decimal::ZERO, 18), "0");
        assert_eq!(format_token_amount(dec!(0.0005), 18), "0.00050000");
        assert_eq!(format_token_amount(dec!(79.6), 18), "79.600000");
        assert_eq!(format_token_amount(dec!(2.5), 2), "2.50");
        assert_eq!(format_token_amount(dec!(1234.56789), 6), "1234.567890");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(43250.75)), "$43,250.75");
        assert_eq!(format_usd(dec!(1000000)), "$1,000,000.00");
        assert_eq!(format_usd(dec!(-42.135)), "-$42.14");
    }
}
