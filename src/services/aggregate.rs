//! Allocation aggregator
//!
//! Folds budget lines into per-CAN pending amounts for the "before approval"
//! and "after approval" views of a review. Entries keep the order in which
//! their CAN was first seen.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, warn};

use super::diff::{resolve, ChangeView, ResolvedChange};
use super::fee::{amount_with_fee, compute_fee};
use crate::models::{BudgetLine, Can, CanId, FeeRate, Money};

/// Status transition being approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusAction {
    DraftToPlanned,
    PlannedToExecuting,
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DraftToPlanned => write!(f, "DRAFT_TO_PLANNED"),
            Self::PlannedToExecuting => write!(f, "PLANNED_TO_EXECUTING"),
        }
    }
}

impl FromStr for StatusAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "DRAFT_TO_PLANNED" | "PLANNED" => Ok(Self::DraftToPlanned),
            "PLANNED_TO_EXECUTING" | "EXECUTING" => Ok(Self::PlannedToExecuting),
            other => Err(format!("Unknown status action: {}", other)),
        }
    }
}

/// Where the review is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPage {
    /// Lines selected for an action by the requester
    #[default]
    Request,
    /// A reviewer approving a status transition
    Approve(StatusAction),
}

impl ReviewPage {
    /// Whether the selected lines' own amounts count toward their CAN
    ///
    /// On the approval page this only holds for draft lines being planned;
    /// already planned money is counted by the CAN upstream.
    pub fn counts_selected_lines(&self) -> bool {
        matches!(self, Self::Request | Self::Approve(StatusAction::DraftToPlanned))
    }
}

/// Inputs for one aggregation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationOptions {
    pub view: ChangeView,
    pub after_approval: bool,
    pub page: ReviewPage,
    /// Fee of the awarding entity a procurement-shop change moves to
    pub new_fee_rate: Option<FeeRate>,
}

impl AggregationOptions {
    pub fn new(view: ChangeView) -> Self {
        Self {
            view,
            ..Default::default()
        }
    }

    pub fn after_approval(self, after_approval: bool) -> Self {
        Self {
            after_approval,
            ..self
        }
    }

    pub fn on_page(self, page: ReviewPage) -> Self {
        Self { page, ..self }
    }

    pub fn with_new_fee_rate(self, new_fee_rate: Option<FeeRate>) -> Self {
        Self {
            new_fee_rate,
            ..self
        }
    }
}

/// Pending amount attributed to one CAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanPending {
    pub can: Can,
    pub pending_amount: Money,
    /// Budget lines currently on this CAN; informational only
    pub count: u32,
}

impl CanPending {
    fn new(can: Can) -> Self {
        Self {
            can,
            pending_amount: Money::zero(),
            count: 0,
        }
    }
}

/// Per-CAN pending amounts in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanAggregation {
    entries: IndexMap<CanId, CanPending>,
}

impl CanAggregation {
    pub fn get(&self, can_id: CanId) -> Option<&CanPending> {
        self.entries.get(&can_id)
    }

    /// Pending amount for a CAN, zero when it was never touched
    pub fn pending_amount(&self, can_id: CanId) -> Money {
        self.get(can_id)
            .map(|entry| entry.pending_amount)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanPending> {
        self.entries.values()
    }

    pub fn can_ids(&self) -> impl Iterator<Item = CanId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_pending(&self) -> Money {
        self.iter().map(|entry| entry.pending_amount).sum()
    }

    pub fn into_entries(self) -> Vec<CanPending> {
        self.entries.into_values().collect()
    }

    fn ensure(&mut self, can_id: CanId, can: Option<&Can>) {
        let known = can.filter(|can| can.id == can_id);
        match self.entries.get_mut(&can_id) {
            Some(entry) => {
                if let Some(can) = known {
                    if entry.can.is_stub() {
                        entry.can = can.clone();
                    }
                }
            }
            None => {
                let can = known.cloned().unwrap_or_else(|| Can::stub(can_id));
                self.entries.insert(can_id, CanPending::new(can));
            }
        }
    }

    fn adjust(&mut self, can_id: CanId, delta: Money) {
        if let Some(entry) = self.entries.get_mut(&can_id) {
            entry.pending_amount = match entry.pending_amount.checked_add(delta) {
                Some(sum) => sum,
                None => {
                    warn!(can = %can_id, "pending amount out of range; clamping");
                    entry.pending_amount + delta
                }
            };
        }
    }

    fn count_line(&mut self, can_id: CanId) {
        if let Some(entry) = self.entries.get_mut(&can_id) {
            entry.count += 1;
        }
    }

    /// Fold one budget line into the aggregation
    fn with_line(mut self, line: &BudgetLine, options: &AggregationOptions) -> Self {
        let Some(current_id) = line.can_id else {
            warn!(budget_line = %line.id, "skipping budget line without a CAN");
            return self;
        };

        let resolved = if options.after_approval {
            resolve(line, options.view, options.new_fee_rate)
        } else {
            ResolvedChange::unchanged(line)
        };
        let new_id = resolved.can_id.unwrap_or(current_id);

        self.ensure(current_id, line.can.as_ref());
        self.ensure(new_id, None);

        let original_rate = Some(line.fee_rate());
        let amount = line.amount;
        let total = amount + resolved.amount_change;

        if new_id != current_id {
            let moved_out = amount_with_fee(amount, original_rate);
            let moved_in = amount_with_fee(total, Some(resolved.fee_rate));
            debug!(
                budget_line = %line.id,
                from = %current_id,
                to = %new_id,
                %moved_out,
                %moved_in,
                "reassigning budget line"
            );
            self.adjust(current_id, -moved_out);
            self.adjust(new_id, moved_in);
        } else {
            let old_fee = compute_fee(amount, original_rate);
            let new_fee = compute_fee(total, Some(resolved.fee_rate));
            self.adjust(current_id, resolved.amount_change + (new_fee - old_fee));
        }

        if options.page.counts_selected_lines() {
            self.adjust(current_id, amount_with_fee(amount, original_rate));
        }

        self.count_line(current_id);
        self
    }
}

impl<'a> IntoIterator for &'a CanAggregation {
    type Item = &'a CanPending;
    type IntoIter = indexmap::map::Values<'a, CanId, CanPending>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// Aggregate budget lines into per-CAN pending amounts
///
/// Lines without a CAN are skipped. The input is only borrowed; calling this
/// repeatedly with the same input yields the same result in the same order.
pub fn aggregate(lines: &[BudgetLine], options: &AggregationOptions) -> CanAggregation {
    lines
        .iter()
        .fold(CanAggregation::default(), |aggregation, line| {
            aggregation.with_line(line, options)
        })
}

/// Aggregate budget lines supplied as untyped JSON
///
/// Anything other than an array is logged and yields an empty aggregation.
/// Elements that do not describe a budget line are logged and skipped.
pub fn aggregate_value(value: &serde_json::Value, options: &AggregationOptions) -> CanAggregation {
    let Some(items) = value.as_array() else {
        error!(
            kind = value_kind(value),
            "budget lines must be an array; nothing to aggregate"
        );
        return CanAggregation::default();
    };

    let lines: Vec<BudgetLine> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            BudgetLine::deserialize(item)
                .map_err(|e| warn!(index, error = %e, "skipping malformed budget line"))
                .ok()
        })
        .collect();

    aggregate(&lines, options)
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
