//! Shared rounding and comparison helpers for the calculators.
//!
//! Rounding happens at fixed points in every formula: whole kronor for the
//! annual figures, öre (two decimals) for per-distance costs. Both helpers
//! round midpoints away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to öre (two decimals), midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use benefit_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(27.182)), dec!(27.18));
/// assert_eq!(round_half_up(dec!(27.185)), dec!(27.19));
/// assert_eq!(round_half_up(dec!(-27.185)), dec!(-27.19));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole kronor, midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use benefit_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(59841.5)), dec!(59842));
/// assert_eq!(round_whole(dec!(59841.49)), dec!(59841));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage (e.g. `4.5`) into a fraction (`0.045`).
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
