//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal`, converted to `f64` only at the
//! storage/serialization boundary, rounded to 2 decimal places half-up.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9_999;

/// Convert an f64 to Decimal, falling back to zero on non-finite input.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to 2 decimal places.
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Σ(unit_price × quantity) over captured line prices.
pub fn cart_total(lines: impl IntoIterator<Item = (f64, i64)>) -> Decimal {
    lines
        .into_iter()
        .map(|(price, qty)| to_decimal(price) * Decimal::from(qty))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_avoids_float_drift() {
        // 0.1 + 0.2 != 0.3 in f64
        assert_ne!(0.1_f64 + 0.2_f64, 0.3);
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn cart_total_matches_line_sums() {
        // 2 x 10.00 + 1 x 15.00 = 35.00
        let total = cart_total([(10.0, 2), (15.0, 1)]);
        assert_eq!(to_f64(total), 35.0);
    }

    #[test]
    fn accumulation_precision() {
        let total = cart_total(std::iter::repeat_n((0.01, 1), 1000));
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn rounding_is_half_up() {
        // Constructed exactly; 10.005 as an f64 literal is already below
        // the midpoint.
        assert_eq!(to_f64(Decimal::new(10_005, 3)), 10.01);
        assert_eq!(to_f64(Decimal::new(10_004, 3)), 10.0);
    }
}
