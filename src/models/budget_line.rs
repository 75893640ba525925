//! Budget line model
//!
//! A budget line is a planned, executing or obligated spending commitment
//! drawn from a single CAN.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::can::Can;
use super::change_request::ChangeRequest;
use super::fee::{FeeRate, FeeRateError};
use super::ids::{AgreementId, BudgetLineId, CanId};
use super::money::Money;
use super::nullable::null_as_default;

/// Lifecycle status of a budget line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetLineStatus {
    #[default]
    Draft,
    Planned,
    #[serde(alias = "EXECUTING")]
    InExecution,
    Obligated,
}

impl BudgetLineStatus {
    /// Obligated lines can no longer be changed
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Obligated)
    }
}

impl fmt::Display for BudgetLineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Planned => write!(f, "Planned"),
            Self::InExecution => write!(f, "Executing"),
            Self::Obligated => write!(f, "Obligated"),
        }
    }
}

/// A budget line with its pending change requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: BudgetLineId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_id: Option<AgreementId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Money,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BudgetLineStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_id: Option<CanId>,

    /// Denormalized CAN summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can: Option<Can>,

    /// Fraction, e.g. `0.005`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_shop_fee_percentage: Option<FeeRate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_needed: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub in_review: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub change_requests_in_review: Vec<ChangeRequest>,
}

impl BudgetLine {
    /// Create a draft budget line on a CAN
    pub fn new(id: BudgetLineId, can_id: CanId, amount: Money) -> Self {
        Self {
            id,
            agreement_id: None,
            amount,
            status: BudgetLineStatus::Draft,
            can_id: Some(can_id),
            can: None,
            proc_shop_fee_percentage: None,
            date_needed: None,
            fiscal_year: None,
            in_review: false,
            change_requests_in_review: Vec::new(),
        }
    }

    pub fn with_fee_rate(mut self, rate: FeeRate) -> Self {
        self.proc_shop_fee_percentage = Some(rate);
        self
    }

    pub fn with_can(mut self, can: Can) -> Self {
        self.can_id = Some(can.id);
        self.can = Some(can);
        self
    }

    pub fn with_status(mut self, status: BudgetLineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_change_request(mut self, change_request: ChangeRequest) -> Self {
        self.in_review = true;
        self.change_requests_in_review.push(change_request);
        self
    }

    /// The line's own fee rate, zero when absent
    pub fn fee_rate(&self) -> FeeRate {
        self.proc_shop_fee_percentage.unwrap_or_default()
    }

    /// Change requests that are still waiting on review
    pub fn pending_change_requests(&self) -> impl Iterator<Item = &ChangeRequest> {
        self.change_requests_in_review
            .iter()
            .filter(|cr| cr.is_in_review())
    }

    /// Stored fiscal year, or the federal fiscal year of `date_needed`
    ///
    /// The federal fiscal year starts on October 1st of the previous
    /// calendar year.
    pub fn fiscal_year(&self) -> Option<i32> {
        self.fiscal_year.or_else(|| {
            self.date_needed.map(|date| {
                if date.month() >= 10 {
                    date.year() + 1
                } else {
                    date.year()
                }
            })
        })
    }

    /// Validate the line's invariants
    pub fn validate(&self) -> Result<(), BudgetLineValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetLineValidationError::NegativeAmount(self.amount));
        }

        if let Some(rate) = self.proc_shop_fee_percentage {
            rate.validate()
                .map_err(BudgetLineValidationError::InvalidFeeRate)?;
        }

        if self.can_id.is_none() {
            return Err(BudgetLineValidationError::MissingCan);
        }

        Ok(())
    }
}

impl fmt::Display for BudgetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.amount, self.status)
    }
}

/// Validation errors for budget lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetLineValidationError {
    NegativeAmount(Money),
    InvalidFeeRate(FeeRateError),
    MissingCan,
}

impl fmt::Display for BudgetLineValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => write!(f, "Amount cannot be negative: {}", amount),
            Self::InvalidFeeRate(err) => write!(f, "{}", err),
            Self::MissingCan => write!(f, "Budget line has no CAN"),
        }
    }
}

impl std::error::Error for BudgetLineValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal() {
        let line: BudgetLine = serde_json::from_value(json!({
            "id": 15000,
            "amount": 700000,
            "status": "PLANNED",
            "can_id": 502,
            "proc_shop_fee_percentage": 0.005
        }))
        .unwrap();

        assert_eq!(line.amount, Money::from_dollars(700_000));
        assert_eq!(line.status, BudgetLineStatus::Planned);
        assert_eq!(line.fee_rate(), FeeRate::from_fraction(dec!(0.005)));
        assert!(line.change_requests_in_review.is_empty());
    }

    #[test]
    fn test_executing_alias() {
        let status: BudgetLineStatus = serde_json::from_str("\"EXECUTING\"").unwrap();
        assert_eq!(status, BudgetLineStatus::InExecution);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"IN_EXECUTION\"");
    }

    #[test]
    fn test_missing_fee_is_zero() {
        let line = BudgetLine::new(BudgetLineId::new(1), CanId::new(1), Money::from_dollars(5));
        assert_eq!(line.fee_rate(), FeeRate::ZERO);
    }

    #[test]
    fn test_fiscal_year() {
        let mut line = BudgetLine::new(BudgetLineId::new(1), CanId::new(1), Money::zero());
        assert_eq!(line.fiscal_year(), None);

        line.date_needed = NaiveDate::from_ymd_opt(2024, 10, 1);
        assert_eq!(line.fiscal_year(), Some(2025));

        line.date_needed = NaiveDate::from_ymd_opt(2025, 9, 30);
        assert_eq!(line.fiscal_year(), Some(2025));

        line.fiscal_year = Some(2023);
        assert_eq!(line.fiscal_year(), Some(2023));
    }

    #[test]
    fn test_validate() {
        let line = BudgetLine::new(BudgetLineId::new(1), CanId::new(1), Money::from_dollars(10));
        assert!(line.validate().is_ok());

        let negative = BudgetLine::new(BudgetLineId::new(2), CanId::new(1), Money::from_dollars(-10));
        assert!(matches!(
            negative.validate(),
            Err(BudgetLineValidationError::NegativeAmount(_))
        ));

        let whole_percent = line
            .clone()
            .with_fee_rate(FeeRate::from_fraction(dec!(4.8)));
        assert!(matches!(
            whole_percent.validate(),
            Err(BudgetLineValidationError::InvalidFeeRate(_))
        ));

        let mut no_can = line;
        no_can.can_id = None;
        assert_eq!(no_can.validate(), Err(BudgetLineValidationError::MissingCan));
    }

    #[test]
    fn test_locked() {
        assert!(BudgetLineStatus::Obligated.is_locked());
        assert!(!BudgetLineStatus::Planned.is_locked());
    }
}
