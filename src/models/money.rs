//! Money type for representing currency amounts
//!
//! Backed by an exact decimal so that fee apportioning (`amount * 0.005`)
//! never loses precision. Arithmetic never rounds; rounding to cents only
//! happens when an amount is displayed. The operators saturate at the
//! `Decimal` bounds instead of panicking; use `checked_add` to detect that.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Represents a monetary amount in currency units (dollars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from an exact decimal
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from whole dollars
    ///
    /// # Examples
    /// ```
    /// use can_review::models::Money;
    /// let amount = Money::from_dollars(700_000);
    /// assert_eq!(amount.to_string(), "$700000.00");
    /// ```
    pub fn from_dollars(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the exact decimal amount
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add, or `None` if the sum leaves the representable range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Amount rounded half-away-from-zero to whole cents, scale fixed at 2
    pub fn rounded_to_cents(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            return Decimal::new(0, 2);
        }
        rounded.rescale(2);
        rounded
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "$1,000.25", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() || cleaned.starts_with('-') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let cents = self.rounded_to_cents();
        if cents.is_sign_negative() && !cents.is_zero() {
            format!("-{}{}", symbol, cents.abs())
        } else {
            format!("{}{}", symbol, cents.abs())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(10.5)).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(dec!(-10.5)).to_string(), "-$10.50");
        assert_eq!(Money::new(dec!(703500)).to_string(), "$703500.00");
        assert_eq!(Money::new(dec!(0.004)).to_string(), "$0.00");
        assert_eq!(Money::new(dec!(-0.004)).to_string(), "$0.00");
        assert_eq!(Money::new(dec!(10.005)).to_string(), "$10.01");
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let a = Money::new(dec!(0.1));
        let b = Money::new(dec!(0.2));

        assert_eq!(a + b, Money::new(dec!(0.3)));
        assert_eq!((a - b).amount(), dec!(-0.1));
        assert_eq!((-a).amount(), dec!(-0.1));
    }

    #[test]
    fn test_overflow_saturates() {
        let max = Money::new(Decimal::MAX);
        let one = Money::from_dollars(1);

        assert_eq!(max + one, max);
        assert_eq!(-max - one, -max);
        assert_eq!(max.checked_add(one), None);
        assert_eq!(one.checked_add(one), Some(Money::from_dollars(2)));

        let mut total = max;
        total += max;
        assert_eq!(total, max);
        let total: Money = [max, max, -one].into_iter().sum();
        assert_eq!(total, max - one);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("$10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("-10.50").unwrap().amount(), dec!(-10.50));
        assert_eq!(Money::parse("$1,000,000").unwrap(), Money::from_dollars(1_000_000));
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("--5").is_err());
    }

    #[test]
    fn test_is_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_dollars(1).is_positive());
        assert!(Money::from_dollars(-1).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_dollars).sum();
        assert_eq!(total, Money::from_dollars(600));
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Money = serde_json::from_str("700000").unwrap();
        let from_string: Money = serde_json::from_str("\"700000.00\"").unwrap();
        assert_eq!(from_number, from_string);
    }
}
