//! CLI commands for inspecting a snapshot: portfolios, change requests, validity

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Settings;
use crate::error::{ReviewError, ReviewResult};
use crate::models::PortfolioKey;
use crate::services::{
    aggregate, collect_portfolios, collect_portfolios_for_cans, AggregationOptions, ChangeView,
};
use crate::storage::ReviewSnapshot;

#[derive(Args, Debug, Clone)]
pub struct PortfoliosArgs {
    /// Snapshot file (.json, .yaml or .yml)
    pub input: PathBuf,

    /// CAN field that carries the portfolio reference
    #[arg(long)]
    pub portfolio_key: Option<PortfolioKey>,

    /// Include portfolios of CANs that budget changes move lines to
    #[arg(long)]
    pub with_reassignments: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ChangesArgs {
    /// Snapshot file (.json, .yaml or .yml)
    pub input: PathBuf,

    /// Only show change requests driving this view
    #[arg(short, long)]
    pub view: Option<ChangeView>,
}

/// Handle the portfolios command
pub fn handle_portfolios(args: &PortfoliosArgs, settings: &Settings) -> ReviewResult<()> {
    let snapshot = ReviewSnapshot::load(&args.input)?;
    let key = args.portfolio_key.unwrap_or(settings.portfolio_key);

    let portfolios = if args.with_reassignments {
        let options = AggregationOptions::new(ChangeView::Budget).after_approval(true);
        let aggregation = aggregate(&snapshot.budget_lines, &options);
        collect_portfolios_for_cans(&aggregation, &snapshot.portfolios, key)
    } else {
        collect_portfolios(&snapshot.budget_lines, &snapshot.portfolios, key)
    };

    if portfolios.is_empty() {
        println!("No portfolios found.");
        return Ok(());
    }

    for portfolio in &portfolios {
        println!("{:<10} {}", portfolio.id, portfolio);
    }

    Ok(())
}

/// Handle the changes command
pub fn handle_changes(args: &ChangesArgs) -> ReviewResult<()> {
    let snapshot = ReviewSnapshot::load(&args.input)?;
    let wanted = args.view.map(|view| view.change_kind());

    let mut shown = 0;
    for line in &snapshot.budget_lines {
        for change_request in line.pending_change_requests() {
            let kind = change_request.kind();
            if wanted.is_some() && kind != wanted {
                continue;
            }

            let kind = kind.map(|k| k.to_string()).unwrap_or_else(|| "unknown".into());
            println!(
                "{:<10} {:<10} {:<17} {}",
                line.id,
                change_request.id,
                kind,
                change_request.describe()
            );
            shown += 1;
        }
    }

    if shown == 0 {
        println!("No change requests in review.");
    }

    Ok(())
}

/// Handle the check command
///
/// Fails when any budget line has a problem, so scripts can gate on it.
pub fn handle_check(input: &Path) -> ReviewResult<()> {
    let snapshot = ReviewSnapshot::load(input)?;
    let issues = snapshot.validate();

    if issues.is_empty() {
        println!(
            "OK: {} budget line(s), {} portfolio(s), {} procurement shop(s)",
            snapshot.budget_lines.len(),
            snapshot.portfolios.len(),
            snapshot.procurement_shops.len()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue);
    }

    Err(ReviewError::Validation(format!(
        "{} problem(s) found in {}",
        issues.len(),
        input.display()
    )))
}
