//! Money type with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! All amounts in a group share one currency, so `Money` carries only the
//! amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Smallest residual treated as a real outstanding amount (one cent)
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Number of fraction digits used when an amount crosses a boundary
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Number of fraction digits kept internally
const INTERNAL_DECIMAL_PLACES: u32 = 4;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount
///
/// Amounts are stored with 4 decimal places internally so that sub-cent
/// residuals are not lost before they are compared against [`TOLERANCE`].
/// On the wire an amount is always a string with exactly two fraction
/// digits, e.g. `"50.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: amount.round_dp(INTERNAL_DECIMAL_PLACES),
        }
    }

    /// Creates Money from an integer amount in minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, CURRENCY_DECIMAL_PLACES))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self { amount: Decimal::ZERO }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is exactly zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the magnitude is below one cent
    pub fn is_negligible(&self) -> bool {
        self.amount.abs() < TOLERANCE
    }

    /// Returns true if the two amounts differ by less than one cent
    pub fn approx_eq(&self, other: &Money) -> bool {
        (self.amount - other.amount).abs() < TOLERANCE
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
        }
    }

    /// Rounds to whole cents (half away from zero)
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                CURRENCY_DECIMAL_PLACES,
                rust_decimal::RoundingStrategy::MidpointAwayFromZero,
            ),
        }
    }

    /// Returns the amount as a fixed two-digit string
    pub fn to_fixed(&self) -> String {
        format!(
            "{:.dp$}",
            self.round_to_cents().amount,
            dp = CURRENCY_DECIMAL_PLACES as usize
        )
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money::new)
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fixed())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fixed())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Money::new)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self { amount: -self.amount }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_sub_cent_residual_is_kept() {
        let residual = Money::new(dec!(50.00)) - Money::new(dec!(49.995));
        assert_eq!(residual.amount(), dec!(0.005));
        assert!(residual.is_negligible());
    }

    #[test]
    fn test_one_cent_is_not_negligible() {
        assert!(!Money::new(dec!(0.01)).is_negligible());
        assert!(!Money::new(dec!(-0.01)).is_negligible());
        assert!(Money::new(dec!(0.0099)).is_negligible());
    }

    #[test]
    fn test_fixed_two_digit_format() {
        assert_eq!(Money::new(dec!(50)).to_fixed(), "50.00");
        assert_eq!(Money::new(dec!(-12.3)).to_fixed(), "-12.30");
        assert_eq!(Money::new(dec!(0.005)).to_fixed(), "0.01");
    }

    #[test]
    fn test_serializes_as_fixed_string() {
        let json = serde_json::to_string(&Money::new(dec!(20))).unwrap();
        assert_eq!(json, "\"20.00\"");
    }

    #[test]
    fn test_deserializes_from_string_and_number() {
        let from_str: Money = serde_json::from_str("\"12.34\"").unwrap();
        let from_num: Money = serde_json::from_str("12.34").unwrap();
        assert_eq!(from_str.amount(), dec!(12.34));
        assert_eq!(from_num, from_str);
    }

    #[test]
    fn test_parse_invalid_amount() {
        let result = "twelve".parse::<Money>();
        assert!(matches!(result, Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_sum() {
        let parts = vec![Money::new(dec!(10)), Money::new(dec!(20.5)), Money::new(dec!(-5))];
        let total: Money = parts.iter().sum();
        assert_eq!(total.amount(), dec!(25.5));
    }
}
