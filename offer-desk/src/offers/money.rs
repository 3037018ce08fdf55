//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` on the wire; sums, averages and rounding are done
//! in `Decimal` and converted back, rounded to cents.

use rust_decimal::prelude::*;

/// Cents precision
const DECIMAL_PLACES: u32 = 2;

/// Upper bound for `importe` on offers and counter-offers
pub const MAX_IMPORTE: f64 = 999_999_999.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places (half-up)
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an amount to cents: half-up on `value * 100`, then `/ 100`
///
/// Rounding works on the f64 value itself, so `1.005` (stored just below
/// the midpoint) gives `1.00`. Input that cannot be rounded (non-finite, or
/// overflowing once scaled) is passed through untouched so validation can
/// still report it.
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.is_finite() { rounded } else { value }
}

/// Round a non-negative ratio to the nearest whole number (half-up),
/// saturating at `u32::MAX`
pub fn round_whole(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(if value.is_sign_negative() { 0 } else { u32::MAX })
}
