//! Display helpers for monetary amounts.
//!
//! Amounts are plain `rust_decimal::Decimal` values in dollars; the store
//! keeps full precision and only rendering rounds to cents.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as dollars with two decimal places, e.g. `$7.81`.
///
/// ```
/// use harvest_hub_core::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(781, 2)), "$7.81");
/// assert_eq!(format_money(Decimal::new(7105, 3)), "$7.11");
/// ```
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_cents() {
        assert_eq!(format_money(Decimal::new(71, 1)), "$7.10");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_money(Decimal::new(7_105, 3)), "$7.11");
        assert_eq!(format_money(Decimal::new(7_104, 3)), "$7.10");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_money(Decimal::new(-250, 2)), "-$2.50");
    }
}
