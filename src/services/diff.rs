//! Change diff resolver
//!
//! Works out the net effect of a budget line's in-review change requests for
//! one review view: how much the amount moves, which CAN the line ends up on,
//! and which fee rate applies afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{BudgetLine, CanId, ChangeKind, ChangeRequest, FeeRate, Money};

/// The review view being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeView {
    #[default]
    Budget,
    Status,
    ProcurementShop,
}

impl ChangeView {
    /// The change request kind that drives this view
    pub fn change_kind(&self) -> ChangeKind {
        match self {
            Self::Budget => ChangeKind::Budget,
            Self::Status => ChangeKind::Status,
            Self::ProcurementShop => ChangeKind::ProcurementShop,
        }
    }
}

impl fmt::Display for ChangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.change_kind())
    }
}

impl FromStr for ChangeView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "budget" | "budget-change" => Ok(Self::Budget),
            "status" | "status-change" => Ok(Self::Status),
            "procurement-shop" | "procurement-shop-change" | "proc-shop" => {
                Ok(Self::ProcurementShop)
            }
            other => Err(format!(
                "Unknown view '{}'. Use budget, status or procurement-shop",
                other
            )),
        }
    }
}

/// Net effect of a line's change requests under one view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChange {
    /// Signed delta to the line's amount
    pub amount_change: Money,
    /// CAN the line is attributed to afterwards
    pub can_id: Option<CanId>,
    /// Fee rate applying afterwards
    pub fee_rate: FeeRate,
}

impl ResolvedChange {
    /// No change: the line's stored values
    pub fn unchanged(line: &BudgetLine) -> Self {
        Self {
            amount_change: Money::zero(),
            can_id: line.can_id,
            fee_rate: line.fee_rate(),
        }
    }

    /// Whether the line moves to a different CAN
    pub fn is_reassigned(&self, line: &BudgetLine) -> bool {
        self.can_id != line.can_id
    }

    fn apply(self, change_request: &ChangeRequest, view: ChangeView, new_fee_rate: Option<FeeRate>) -> Self {
        let diff = &change_request.requested_change_diff;
        match view {
            ChangeView::Budget => {
                let amount_change = diff
                    .amount
                    .as_ref()
                    .and_then(|change| Some(change.new? - change.old?))
                    .unwrap_or(self.amount_change);
                let can_id = diff
                    .can_id
                    .as_ref()
                    .and_then(|change| change.new)
                    .or(self.can_id);
                Self {
                    amount_change,
                    can_id,
                    ..self
                }
            }
            ChangeView::ProcurementShop => match diff.awarding_entity_id {
                Some(_) => Self {
                    fee_rate: new_fee_rate.unwrap_or(FeeRate::ZERO),
                    ..self
                },
                None => self,
            },
            ChangeView::Status => self,
        }
    }
}

/// Resolve a line's in-review change requests for `view`
///
/// Requests are applied in list order and later diffs overwrite earlier ones
/// field by field. `new_fee_rate` is the fee of the awarding entity a
/// procurement-shop change would switch to.
pub fn resolve(line: &BudgetLine, view: ChangeView, new_fee_rate: Option<FeeRate>) -> ResolvedChange {
    let kind = view.change_kind();
    line.pending_change_requests()
        .filter(|cr| cr.kind() == Some(kind))
        .fold(ResolvedChange::unchanged(line), |resolved, cr| {
            resolved.apply(cr, view, new_fee_rate)
        })
}
