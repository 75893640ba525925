//! Change request model
//!
//! A change request is a proposed edit to a budget line that waits for a
//! reviewer. Only the requested diff matters to the review computations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::budget_line::BudgetLineStatus;
use super::ids::{AgreementId, BudgetLineId, CanId, ChangeRequestId, ProcurementShopId};
use super::money::Money;
use super::nullable::null_as_default;

/// Review status of a change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestStatus {
    #[default]
    InReview,
    Approved,
    Rejected,
}

impl fmt::Display for ChangeRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InReview => write!(f, "In Review"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// The kind of edit a change request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Budget,
    Status,
    ProcurementShop,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Budget => write!(f, "budget"),
            Self::Status => write!(f, "status"),
            Self::ProcurementShop => write!(f, "procurement-shop"),
        }
    }
}

/// An `{old, new}` pair; either side may be missing in upstream data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange<T> {
    #[serde(default = "Option::default")]
    pub old: Option<T>,
    #[serde(default = "Option::default")]
    pub new: Option<T>,
}

impl<T> FieldChange<T> {
    pub fn new(old: T, new: T) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }
}

impl<T: fmt::Display> FieldChange<T> {
    fn describe(&self, field: &str) -> String {
        let side = |v: &Option<T>| match v {
            Some(v) => v.to_string(),
            None => "(none)".to_string(),
        };
        format!("{}: {} -> {}", field, side(&self.old), side(&self.new))
    }
}

/// The typed diff carried by a change request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedChangeDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<FieldChange<Money>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_id: Option<FieldChange<CanId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_needed: Option<FieldChange<NaiveDate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FieldChange<BudgetLineStatus>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarding_entity_id: Option<FieldChange<ProcurementShopId>>,
}

impl RequestedChangeDiff {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.can_id.is_none()
            && self.date_needed.is_none()
            && self.status.is_none()
            && self.awarding_entity_id.is_none()
    }

    /// Kind inferred from which fields are present
    pub fn inferred_kind(&self) -> Option<ChangeKind> {
        if self.amount.is_some() || self.can_id.is_some() || self.date_needed.is_some() {
            Some(ChangeKind::Budget)
        } else if self.awarding_entity_id.is_some() {
            Some(ChangeKind::ProcurementShop)
        } else if self.status.is_some() {
            Some(ChangeKind::Status)
        } else {
            None
        }
    }

    /// One human-readable line per changed field
    pub fn describe(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(change) = &self.amount {
            changes.push(change.describe("amount"));
        }
        if let Some(change) = &self.can_id {
            changes.push(change.describe("can_id"));
        }
        if let Some(change) = &self.date_needed {
            changes.push(change.describe("date_needed"));
        }
        if let Some(change) = &self.status {
            changes.push(change.describe("status"));
        }
        if let Some(change) = &self.awarding_entity_id {
            changes.push(change.describe("awarding_entity_id"));
        }
        changes
    }
}

/// A change request waiting on (or finished with) review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: ChangeRequestId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_line_id: Option<BudgetLineId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_id: Option<AgreementId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub has_budget_change: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub has_status_change: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub has_proc_shop_change: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_change_diff: RequestedChangeDiff,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ChangeRequestStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_change_info: Option<String>,
}

impl ChangeRequest {
    /// A budget-change request against a budget line
    pub fn budget_change(
        id: ChangeRequestId,
        budget_line_id: BudgetLineId,
        diff: RequestedChangeDiff,
    ) -> Self {
        Self {
            id,
            budget_line_id: Some(budget_line_id),
            agreement_id: None,
            has_budget_change: true,
            has_status_change: false,
            has_proc_shop_change: false,
            requested_change_diff: diff,
            status: ChangeRequestStatus::InReview,
            requested_change_info: None,
        }
    }

    /// A procurement-shop change request
    pub fn proc_shop_change(
        id: ChangeRequestId,
        budget_line_id: BudgetLineId,
        diff: RequestedChangeDiff,
    ) -> Self {
        Self {
            has_budget_change: false,
            has_proc_shop_change: true,
            ..Self::budget_change(id, budget_line_id, diff)
        }
    }

    /// A status change request
    pub fn status_change(
        id: ChangeRequestId,
        budget_line_id: BudgetLineId,
        diff: RequestedChangeDiff,
    ) -> Self {
        Self {
            has_budget_change: false,
            has_status_change: true,
            ..Self::budget_change(id, budget_line_id, diff)
        }
    }

    pub fn is_in_review(&self) -> bool {
        self.status == ChangeRequestStatus::InReview
    }

    /// The kind of change, from the explicit flags or else from the diff
    pub fn kind(&self) -> Option<ChangeKind> {
        if self.has_budget_change {
            Some(ChangeKind::Budget)
        } else if self.has_proc_shop_change {
            Some(ChangeKind::ProcurementShop)
        } else if self.has_status_change {
            Some(ChangeKind::Status)
        } else {
            self.requested_change_diff.inferred_kind()
        }
    }

    /// Summary of the requested diff, e.g. `amount: $300000.00 -> $400000.00`
    pub fn describe(&self) -> String {
        let changes = self.requested_change_diff.describe();
        if changes.is_empty() {
            "(no changes)".to_string()
        } else {
            changes.join(", ")
        }
    }
}
