//! CAN Review Report
//!
//! Puts the before-approval and after-approval aggregations side by side for
//! every CAN a review touches, grouped by portfolio.

use serde::Serialize;

use crate::models::{BudgetLine, Can, CanId, Money, Portfolio, PortfolioId, PortfolioKey};
use crate::services::{aggregate, AggregationOptions, CanAggregation, ChangeView, ReviewPage};

/// A row in the review report for a single CAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanReportRow {
    pub can_id: CanId,
    pub can_name: String,
    pub portfolio_id: Option<PortfolioId>,
    /// Pending amount before the change requests are approved
    pub before: Money,
    /// Pending amount once they are approved
    pub after: Money,
    /// `after - before`
    pub delta: Money,
    /// Budget lines currently on this CAN
    pub line_count: u32,
    pub available_funding: Option<Money>,
    /// Available funding left once the pending amount after approval lands
    pub remaining_after: Option<Money>,
}

impl CanReportRow {
    /// Check if approving would take more than the CAN has available
    pub fn is_over_committed(&self) -> bool {
        self.remaining_after.is_some_and(|m| m.is_negative())
    }
}

/// A portfolio with its CAN rows and totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioReportRow {
    pub portfolio_id: Option<PortfolioId>,
    pub portfolio_name: String,
    pub cans: Vec<CanReportRow>,
    pub total_before: Money,
    pub total_after: Money,
    pub total_delta: Money,
}

impl PortfolioReportRow {
    pub fn new(portfolio_id: Option<PortfolioId>, portfolio_name: String) -> Self {
        Self {
            portfolio_id,
            portfolio_name,
            cans: Vec::new(),
            total_before: Money::zero(),
            total_after: Money::zero(),
            total_delta: Money::zero(),
        }
    }

    /// Add a CAN to this portfolio
    pub fn add_can(&mut self, row: CanReportRow) {
        self.total_before += row.before;
        self.total_after += row.after;
        self.total_delta += row.delta;
        self.cans.push(row);
    }

    pub fn has_over_committed(&self) -> bool {
        self.cans.iter().any(|c| c.is_over_committed())
    }
}

/// Before/after review of CAN pending amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanReviewReport {
    pub view: ChangeView,
    pub page: ReviewPage,
    pub groups: Vec<PortfolioReportRow>,
    pub grand_total_before: Money,
    pub grand_total_after: Money,
    pub grand_total_delta: Money,
}

impl CanReviewReport {
    /// Generate the report for `lines`
    ///
    /// `options.after_approval` is ignored; both sides are always computed.
    pub fn generate(
        lines: &[BudgetLine],
        portfolios: &[Portfolio],
        options: &AggregationOptions,
        key: PortfolioKey,
    ) -> Self {
        let before = aggregate(lines, &options.after_approval(false));
        let after = aggregate(lines, &options.after_approval(true));

        let mut groups: Vec<PortfolioReportRow> = Vec::new();
        for can_id in union_in_order(&before, &after) {
            let can = best_known_can(can_id, &before, &after, lines);
            let portfolio_id = can.portfolio_id_by(key);
            let row = build_row(can_id, &can, portfolio_id, &before, &after);

            match groups.iter_mut().find(|g| g.portfolio_id == portfolio_id) {
                Some(group) => group.add_can(row),
                None => {
                    let mut group =
                        PortfolioReportRow::new(portfolio_id, portfolio_name(portfolio_id, portfolios));
                    group.add_can(row);
                    groups.push(group);
                }
            }
        }

        let grand_total_before = groups.iter().map(|g| g.total_before).sum();
        let grand_total_after = groups.iter().map(|g| g.total_after).sum();
        let grand_total_delta = groups.iter().map(|g| g.total_delta).sum();

        Self {
            view: options.view,
            page: options.page,
            groups,
            grand_total_before,
            grand_total_after,
            grand_total_delta,
        }
    }

    /// All CAN rows in report order
    pub fn rows(&self) -> impl Iterator<Item = &CanReportRow> {
        self.groups.iter().flat_map(|g| g.cans.iter())
    }

    pub fn row(&self, can_id: CanId) -> Option<&CanReportRow> {
        self.rows().find(|r| r.can_id == can_id)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("CAN Review - {} changes\n", self.view));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.groups.is_empty() {
            output.push_str("No CANs affected.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<26} {:>17} {:>17} {:>17}\n",
            "CAN", "Before", "After", "Change"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for group in &self.groups {
            output.push_str(&format!("\n{}\n", group.portfolio_name.to_uppercase()));

            for can in &group.cans {
                let after_display = if can.is_over_committed() {
                    format!("{} *", can.after)
                } else {
                    can.after.to_string()
                };

                output.push_str(&format!(
                    "  {:<24} {:>17} {:>17} {:>17}\n",
                    truncate(&can.can_name, 24),
                    can.before,
                    after_display,
                    can.delta
                ));
            }

            output.push_str(&format!(
                "  {:<24} {:>17} {:>17} {:>17}\n",
                "Portfolio Total:", group.total_before, group.total_after, group.total_delta
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>17} {:>17} {:>17}\n",
            "GRAND TOTAL", self.grand_total_before, self.grand_total_after, self.grand_total_delta
        ));

        if self.rows().any(|r| r.is_over_committed()) {
            output.push_str("\n* = Exceeds available funding\n");
        }

        output
    }
}

fn union_in_order(before: &CanAggregation, after: &CanAggregation) -> Vec<CanId> {
    before.can_ids().chain(after.can_ids()).fold(Vec::new(), |mut ids, id| {
        if !ids.contains(&id) {
            ids.push(id);
        }
        ids
    })
}

/// The fullest CAN record available for an id; reassignment targets are
/// stubs in the aggregation but may appear denormalized on another line
fn best_known_can(
    can_id: CanId,
    before: &CanAggregation,
    after: &CanAggregation,
    lines: &[BudgetLine],
) -> Can {
    [before.get(can_id), after.get(can_id)]
        .into_iter()
        .flatten()
        .map(|entry| &entry.can)
        .chain(lines.iter().filter_map(|line| line.can.as_ref()))
        .find(|can| can.id == can_id && !can.is_stub())
        .cloned()
        .unwrap_or_else(|| Can::stub(can_id))
}

fn build_row(
    can_id: CanId,
    can: &Can,
    portfolio_id: Option<PortfolioId>,
    before: &CanAggregation,
    after: &CanAggregation,
) -> CanReportRow {
    let before_amount = before.pending_amount(can_id);
    let after_amount = after.pending_amount(can_id);
    let available_funding = can.available_funding();

    CanReportRow {
        can_id,
        can_name: can.label(),
        portfolio_id,
        before: before_amount,
        after: after_amount,
        delta: after_amount - before_amount,
        line_count: after.get(can_id).map(|e| e.count).unwrap_or_default(),
        available_funding,
        remaining_after: available_funding.map(|available| available - after_amount),
    }
}

fn portfolio_name(portfolio_id: Option<PortfolioId>, portfolios: &[Portfolio]) -> String {
    match portfolio_id {
        Some(id) => portfolios
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Portfolio {}", id.value())),
        None => "Unassigned".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BudgetLineId, CanFunding, ChangeRequest, ChangeRequestId, FeeRate, FieldChange,
        RequestedChangeDiff,
    };
    use rust_decimal_macros::dec;

    fn can(id: u64, portfolio: u64, name: &str, available: i64) -> Can {
        let mut can = Can::stub(CanId::new(id));
        can.display_name = Some(name.to_string());
        can.managing_portfolio_id = Some(PortfolioId::new(portfolio));
        can.funding = Some(CanFunding {
            available_funding: Money::from_dollars(available),
            ..Default::default()
        });
        can
    }

    fn line(id: u64, can: Can, amount: i64) -> BudgetLine {
        BudgetLine::new(BudgetLineId::new(id), can.id, Money::from_dollars(amount))
            .with_can(can)
            .with_fee_rate(FeeRate::from_fraction(dec!(0.005)))
    }

    fn reassign(line_id: u64, from: u64, to: u64) -> ChangeRequest {
        ChangeRequest::budget_change(
            ChangeRequestId::new(line_id),
            BudgetLineId::new(line_id),
            RequestedChangeDiff {
                can_id: Some(FieldChange::new(CanId::new(from), CanId::new(to))),
                ..Default::default()
            },
        )
    }

    fn portfolios() -> Vec<Portfolio> {
        vec![
            Portfolio::new(PortfolioId::new(1), "Child Welfare Research"),
            Portfolio::new(PortfolioId::new(2), "Home Visiting"),
        ]
    }

    fn report(lines: &[BudgetLine]) -> CanReviewReport {
        CanReviewReport::generate(
            lines,
            &portfolios(),
            &AggregationOptions::new(ChangeView::Budget),
            PortfolioKey::ManagingPortfolioId,
        )
    }

    #[test]
    fn test_reassignment_report() {
        let target = can(512, 2, "G99XXX8", 1_000_000);
        let lines = vec![
            line(1, can(502, 1, "G99HRF2", 5_000_000), 700_000).with_change_request(reassign(1, 502, 512)),
            line(2, target, 100_000),
        ];

        let report = report(&lines);

        let from = report.row(CanId::new(502)).unwrap();
        assert_eq!(from.before, Money::from_dollars(703_500));
        assert_eq!(from.after, Money::zero());
        assert_eq!(from.delta, Money::from_dollars(-703_500));

        let to = report.row(CanId::new(512)).unwrap();
        assert_eq!(to.can_name, "G99XXX8");
        assert_eq!(to.before, Money::from_dollars(100_500));
        assert_eq!(to.after, Money::from_dollars(804_000));
        assert_eq!(to.remaining_after, Some(Money::from_dollars(196_000)));
        assert!(!to.is_over_committed());

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].portfolio_name, "Child Welfare Research");
        assert_eq!(report.grand_total_before, report.grand_total_after);
        assert_eq!(report.grand_total_delta, Money::zero());
    }

    #[test]
    fn test_over_committed_flag() {
        let lines = vec![line(1, can(502, 1, "G99HRF2", 500_000), 700_000)];
        let report = report(&lines);

        assert!(report.row(CanId::new(502)).unwrap().is_over_committed());
        assert!(report.groups[0].has_over_committed());
        assert!(report.format_terminal().contains("* = Exceeds available funding"));
    }

    #[test]
    fn test_unknown_target_is_unassigned() {
        let lines = vec![line(1, can(502, 1, "G99HRF2", 5_000_000), 100).with_change_request(reassign(1, 502, 999))];
        let report = report(&lines);

        let last = report.groups.last().unwrap();
        assert_eq!(last.portfolio_name, "Unassigned");
        assert_eq!(last.cans[0].can_name, "can-999");
        assert_eq!(last.cans[0].available_funding, None);
    }

    #[test]
    fn test_format_terminal() {
        let lines = vec![line(1, can(502, 1, "G99HRF2", 5_000_000), 700_000)];
        let output = report(&lines).format_terminal();

        assert!(output.contains("CAN Review - budget changes"));
        assert!(output.contains("CHILD WELFARE RESEARCH"));
        assert!(output.contains("G99HRF2"));
        assert!(output.contains("$703500.00"));
        assert!(!output.contains("Exceeds"));
    }

    #[test]
    fn test_empty_report() {
        let report = report(&[]);
        assert!(report.groups.is_empty());
        assert!(report.format_terminal().contains("No CANs affected."));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("A very long CAN nickname", 10), "A very ...");
    }
}
