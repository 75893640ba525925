//! Fee calculator
//!
//! Fees are a straight multiplication of the base amount by the fee rate.
//! No rounding happens here; cents are a display concern.

use crate::models::{FeeRate, Money};

/// Fee owed on `base` at `rate`; a missing rate counts as zero
pub fn compute_fee(base: Money, rate: Option<FeeRate>) -> Money {
    rate.unwrap_or_default().apply(base)
}

/// `base` plus its fee
pub fn amount_with_fee(base: Money, rate: Option<FeeRate>) -> Money {
    base + compute_fee(base, rate)
}
