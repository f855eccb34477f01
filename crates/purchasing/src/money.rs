//! Monetary value used for line item costs and spend limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendguard_core::ValueObject;

/// Exact decimal amount.
///
/// No currency and no sign validation: negative amounts are representable and
/// flow through the arithmetic unchanged. Arithmetic is checked.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// `None` if the sum is not representable.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `None` if the difference is not representable.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl ValueObject for Money {}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimal_arithmetic_is_exact() {
        let a = Money::new(dec!(0.1));
        let b = Money::new(dec!(0.2));
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum, Money::new(dec!(0.3)));
        assert_eq!(sum.checked_sub(a), Some(b));
    }

    #[test]
    fn overflow_is_none_not_a_panic() {
        let max = Money::new(Decimal::MAX);
        let min = Money::new(Decimal::MIN);
        assert_eq!(max.checked_add(Money::from(1)), None);
        assert_eq!(max.checked_sub(min), None);
        assert_eq!(max.saturating_add(max), max);
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.50))).unwrap();
        assert_eq!(json, "\"12.50\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::new(dec!(12.5)));
    }
}
