//! Portfolio collector
//!
//! Derives the distinct portfolios touched by a set of budget lines, for
//! grouping CAN cards by portfolio.

use tracing::debug;

use super::aggregate::CanAggregation;
use crate::models::{BudgetLine, Can, Portfolio, PortfolioKey};

/// Distinct portfolios referenced by the lines' CANs, in first-seen order
///
/// Portfolios are looked up by id in `portfolios` and deduplicated by id.
/// Lines whose CAN or portfolio is unknown are passed over.
pub fn collect_portfolios(
    lines: &[BudgetLine],
    portfolios: &[Portfolio],
    key: PortfolioKey,
) -> Vec<Portfolio> {
    collect(lines.iter().filter_map(|line| line.can.as_ref()), portfolios, key)
}

/// Distinct portfolios of the CANs in an aggregation, in entry order
///
/// Unlike [`collect_portfolios`] this covers reassignment targets, as long
/// as their CAN record is known.
pub fn collect_portfolios_for_cans(
    aggregation: &CanAggregation,
    portfolios: &[Portfolio],
    key: PortfolioKey,
) -> Vec<Portfolio> {
    collect(aggregation.iter().map(|entry| &entry.can), portfolios, key)
}

fn collect<'a>(
    cans: impl Iterator<Item = &'a Can>,
    portfolios: &[Portfolio],
    key: PortfolioKey,
) -> Vec<Portfolio> {
    cans.filter_map(|can| {
        let portfolio_id = can.portfolio_id_by(key)?;
        let found = portfolios.iter().find(|p| p.id == portfolio_id);
        if found.is_none() {
            debug!(can = %can.id, portfolio = %portfolio_id, "portfolio not in lookup table");
        }
        found
    })
    .fold(Vec::new(), |mut collected: Vec<Portfolio>, portfolio| {
        if !collected.iter().any(|p| p.id == portfolio.id) {
            collected.push(portfolio.clone());
        }
        collected
    })
}
