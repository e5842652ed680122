//! Type-safe price representation using decimal arithmetic.
//!
//! All prices are in Brazilian reais. Display follows the `pt-BR` convention
//! (`R$ 1.234,50`): dot as the thousands separator, comma before the cents.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable amount.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a new price from a decimal amount in reais.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The amount in reais.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply a unit price by a quantity, saturating at the largest
    /// representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Multiply a unit price by a quantity; `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Add two prices; `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Format for display (e.g., `R$ 1.234,50`).
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let digits = format!("{:.2}", rounded.abs());
        let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, c) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}R$ {grouped},{cents}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_small_amount() {
        assert_eq!(Price::from_cents(1250).display(), "R$ 12,50");
        assert_eq!(Price::from_cents(5).display(), "R$ 0,05");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Price::ZERO.display(), "R$ 0,00");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_cents(123_450).display(), "R$ 1.234,50");
        assert_eq!(Price::from_cents(100_000_000).display(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::from_cents(-990).display(), "-R$ 9,90");
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_cents(1990);
        assert_eq!(unit.times(3), Price::from_cents(5970));

        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_overflow_is_detected() {
        let huge: Price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();

        assert_eq!(huge.checked_times(2), None);
        assert_eq!(huge, Price::MAX);
        assert_eq!(huge.checked_add(Price::new(Decimal::ONE)), None);
        assert_eq!(huge.checked_times(1), Some(huge));
        assert_eq!(huge.times(2), Price::MAX);
        assert_eq!(huge + huge, Price::MAX);
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_cents(1250)).unwrap();
        assert_eq!(json, "\"12.50\"");
        let parsed: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(parsed, Price::from_cents(1250));
    }
}
