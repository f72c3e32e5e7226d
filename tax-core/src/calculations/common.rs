//! Helpers for presenting calculation results.
//!
//! The calculator works in `f64`. These functions turn its output into
//! currency amounts and rates at the display boundary.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a floating-point amount to a currency value rounded half-up to
/// cents.
///
/// Returns `None` for NaN, infinities, and magnitudes a [`Decimal`] cannot
/// hold.
pub fn to_currency(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(round_half_up)
}

/// Total tax as a percentage of income.
///
/// Returns `None` when income is zero or negative, where the ratio has no
/// meaning.
///
/// ```
/// use tax_core::effective_rate;
///
/// assert_eq!(effective_rate(200.0, 1000.0), Some(20.0));
/// assert_eq!(effective_rate(0.0, 0.0), None);
/// ```
pub fn effective_rate(
    total_tax: f64,
    income: f64,
) -> Option<f64> {
    if income > 0.0 {
        Some(total_tax / income * 100.0)
    } else {
        None
    }
}
