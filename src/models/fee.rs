//! Fee rate model
//!
//! A fee rate is always held as a fraction (`0.005` is half a percent).
//! Procurement shops publish their fees as whole percentages; those values
//! are converted exactly once, through [`FeeRate::from_percent`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A fee expressed as a fraction in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(Decimal);

impl FeeRate {
    /// No fee
    pub const ZERO: FeeRate = FeeRate(Decimal::ZERO);

    /// Create a rate from a fraction (`0.005` for 0.5%)
    pub const fn from_fraction(fraction: Decimal) -> Self {
        Self(fraction)
    }

    /// Create a rate from a whole percentage (`4.8` for 4.8%)
    pub fn from_percent(percent: Decimal) -> Self {
        Self(percent / Decimal::ONE_HUNDRED)
    }

    /// The rate as a fraction
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// The rate as a whole percentage
    pub fn as_percent(&self) -> Decimal {
        self.0.saturating_mul(Decimal::ONE_HUNDRED)
    }

    /// Apply the rate to an amount, without rounding
    pub fn apply(&self, base: Money) -> Money {
        Money::new(base.amount().saturating_mul(self.0))
    }

    /// Validate that the rate is a fraction in `[0, 1]`
    pub fn validate(&self) -> Result<(), FeeRateError> {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            return Err(FeeRateError::Negative(self.0));
        }
        if self.0 > Decimal::ONE {
            return Err(FeeRateError::AboveOne(self.0));
        }
        Ok(())
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent().normalize())
    }
}

/// Validation errors for fee rates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeRateError {
    Negative(Decimal),
    AboveOne(Decimal),
}

impl fmt::Display for FeeRateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeRateError::Negative(v) => write!(f, "Fee rate cannot be negative: {}", v),
            FeeRateError::AboveOne(v) => write!(
                f,
                "Fee rate {} is above 1; whole percentages must be converted to a fraction",
                v
            ),
        }
    }
}

impl std::error::Error for FeeRateError {}
