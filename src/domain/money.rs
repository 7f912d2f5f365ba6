use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Exact cash amount, held at a fixed four fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const TARGET_DECIMALS: u32 = 4;
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds half to even when `value` carries more than four decimals.
    pub fn new(value: Decimal) -> Self {
        let mut rounded = value
            .round_dp_with_strategy(Self::TARGET_DECIMALS, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::TARGET_DECIMALS);
        Self(rounded)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money::new)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money::new)
    }

    /// Cost of `quantity` units at this price.
    pub fn checked_mul_quantity(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money::new)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money::new(Decimal::from(value))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money::new)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s)
            .map_err(|_| serde::de::Error::custom(format!("Invalid Money format: {}", s)))
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn bankers_round_half_even() {
        assert_eq!(Money::new(dec!(1.23445)).to_string(), "1.2344");
        assert_eq!(Money::new(dec!(1.23455)).to_string(), "1.2346");
        assert_eq!(Money::new(dec!(-1.23445)).to_string(), "-1.2344");
        assert_eq!(Money::new(dec!(-1.23455)).to_string(), "-1.2346");
    }

    #[test]
    fn parses_and_pads_to_four_places() {
        let m: Money = " 170 ".parse().unwrap();
        assert_eq!(m.to_string(), "170.0000");
        assert_eq!(m, Money::from(170));
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn repeated_cycles_do_not_drift() {
        let price = Money::new(dec!(0.1));
        let mut balance = Money::from(1);
        for _ in 0..1_000 {
            balance = balance.checked_sub(price).unwrap();
            balance = balance.checked_add(price).unwrap();
        }
        assert_eq!(balance, Money::from(1));
        assert_eq!(price.checked_mul_quantity(3), Some(Money::new(dec!(0.3))));
    }

    #[test]
    fn overflow_is_reported() {
        let huge = Money::new(rust_decimal::Decimal::MAX);
        assert!(huge.checked_mul_quantity(i64::MAX).is_none());
    }
}
