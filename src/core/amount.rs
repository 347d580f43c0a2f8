//! Fixed-point number formatting shared by every document generator.
//!
//! Amounts are always written with exactly two decimals, `.` as separator
//! and no grouping. Rates use two decimals in documents and four decimals
//! as tax bucket keys.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of every emitted amount.
pub const AMOUNT_SCALE: u32 = 2;
/// Decimal places of a canonical tax rate bucket key.
pub const RATE_KEY_SCALE: u32 = 4;

/// Round to `dp` decimal places, halves away from zero (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Render `value` with exactly `dp` decimal places.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut v = round_half_up(value, dp);
    if v.is_zero() {
        v = Decimal::ZERO;
    }
    v.rescale(dp);
    v.to_string()
}

/// Format a monetary amount: `1234.5` → `"1234.50"`.
pub fn format_amount(value: Decimal) -> String {
    fixed(value, AMOUNT_SCALE)
}

/// Format a tax rate percentage for documents: `9.5` → `"9.50"`.
pub fn format_rate(value: Decimal) -> String {
    fixed(value, AMOUNT_SCALE)
}

/// Decimal places a quantity is rounded to before trimming.
pub const QUANTITY_SCALE: u32 = 4;

/// Format a quantity: four decimals at most, trimmed to no fewer than two.
pub fn format_quantity(value: Decimal) -> String {
    let s = round_half_up(value, QUANTITY_SCALE).normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(dec!(10)), "10.00");
        assert_eq!(format_amount(dec!(9.5)), "9.50");
        assert_eq!(format_amount(dec!(1833.48)), "1833.48");
        assert_eq!(format_amount(dec!(1234567.891)), "1234567.89");
        assert_eq!(format_amount(dec!(-12.5)), "-12.50");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(format_amount(dec!(19.998)), "20.00");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(dec!(2.345)), "2.35");
        assert_eq!(format_amount(dec!(-2.345)), "-2.35");
        assert_eq!(fixed(dec!(9.999999999), 3), "10.000");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_amount(dec!(-0.001)), "0.00");
    }

    #[test]
    fn rate_keys_use_four_decimals() {
        assert_eq!(fixed(dec!(9.999), RATE_KEY_SCALE), "9.9990");
        assert_eq!(fixed(dec!(20), RATE_KEY_SCALE), "20.0000");
    }

    #[test]
    fn quantity_cases() {
        assert_eq!(format_quantity(dec!(1)), "1.00");
        assert_eq!(format_quantity(dec!(1.5)), "1.50");
        assert_eq!(format_quantity(dec!(0.125)), "0.125");
        assert_eq!(format_quantity(dec!(2.123456)), "2.1235");
        assert_eq!(format_quantity(dec!(3.10000)), "3.10");
    }
}
