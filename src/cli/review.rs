//! CLI command for per-CAN pending amounts
//!
//! Also holds the options shared by every command that aggregates a
//! snapshot.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{ReviewError, ReviewResult};
use crate::models::{FeeRate, PortfolioKey, ProcurementShopId};
use crate::services::{aggregate, AggregationOptions, ChangeView, ReviewPage, StatusAction};
use crate::storage::ReviewSnapshot;

/// Where the review is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    Request,
    Approve,
}

/// Options shared by the review and report commands
#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    /// Snapshot file (.json, .yaml or .yml)
    pub input: PathBuf,

    /// Change view: budget, status or procurement-shop
    #[arg(short, long)]
    pub view: Option<ChangeView>,

    /// Review page
    #[arg(short, long, value_enum)]
    pub page: Option<PageArg>,

    /// Status transition being approved (implies --page approve)
    #[arg(long)]
    pub action: Option<StatusAction>,

    /// Fee of the new procurement shop, as a whole percent (e.g. 4.8)
    #[arg(long, conflicts_with = "new_shop")]
    pub fee_override: Option<Decimal>,

    /// Id of the procurement shop the change moves to
    #[arg(long)]
    pub new_shop: Option<u64>,

    /// CAN field that carries the portfolio reference
    #[arg(long)]
    pub portfolio_key: Option<PortfolioKey>,
}

/// Arguments of the review command
///
/// The report always shows both sides, so only this command takes
/// `--after-approval`.
#[derive(Args, Debug, Clone)]
pub struct ReviewCommandArgs {
    #[command(flatten)]
    pub review: ReviewArgs,

    /// Apply in-review change requests
    #[arg(short, long)]
    pub after_approval: bool,
}

impl ReviewArgs {
    /// Load the snapshot and warn about anything invalid in it
    pub fn load_snapshot(&self) -> ReviewResult<ReviewSnapshot> {
        let snapshot = ReviewSnapshot::load(&self.input)?;
        for issue in snapshot.validate() {
            warn!(%issue, "invalid budget line in snapshot");
        }
        Ok(snapshot)
    }

    pub fn portfolio_key(&self, settings: &Settings) -> PortfolioKey {
        self.portfolio_key.unwrap_or(settings.portfolio_key)
    }

    pub fn page(&self) -> ReviewResult<ReviewPage> {
        match (self.page, self.action) {
            (None | Some(PageArg::Request), None) => Ok(ReviewPage::Request),
            (None | Some(PageArg::Approve), Some(action)) => Ok(ReviewPage::Approve(action)),
            (Some(PageArg::Approve), None) => Err(ReviewError::Validation(
                "--page approve needs an --action".into(),
            )),
            (Some(PageArg::Request), Some(_)) => Err(ReviewError::Validation(
                "--action only applies to --page approve".into(),
            )),
        }
    }

    /// Fee rate a procurement-shop change moves to, if one was given
    pub fn new_fee_rate(&self, snapshot: &ReviewSnapshot) -> ReviewResult<Option<FeeRate>> {
        if let Some(percent) = self.fee_override {
            let rate = FeeRate::from_percent(percent);
            rate.validate()
                .map_err(|e| ReviewError::Validation(format!("--fee-override: {}", e)))?;
            return Ok(Some(rate));
        }

        match self.new_shop {
            Some(id) => {
                let shop = snapshot.procurement_shop(ProcurementShopId::new(id))?;
                debug!(shop = %shop, rate = %shop.fee_rate(), "using procurement shop fee");
                Ok(Some(shop.fee_rate()))
            }
            None => Ok(None),
        }
    }

    pub fn options(
        &self,
        snapshot: &ReviewSnapshot,
        settings: &Settings,
    ) -> ReviewResult<AggregationOptions> {
        Ok(AggregationOptions::new(self.view.unwrap_or(settings.default_view))
            .on_page(self.page()?)
            .with_new_fee_rate(self.new_fee_rate(snapshot)?))
    }
}

/// Handle the review command
pub fn handle_review(args: &ReviewCommandArgs, settings: &Settings) -> ReviewResult<()> {
    let snapshot = args.review.load_snapshot()?;
    let options = args
        .review
        .options(&snapshot, settings)?
        .after_approval(args.after_approval);
    let aggregation = aggregate(&snapshot.budget_lines, &options);
    let symbol = settings.currency_symbol.as_str();

    let side = if options.after_approval {
        "after approval"
    } else {
        "before approval"
    };
    println!("CAN pending amounts - {} changes ({})", options.view, side);
    println!("{}", "=".repeat(60));

    if aggregation.is_empty() {
        println!("No CANs affected.");
        return Ok(());
    }

    println!("{:<30} {:>20} {:>7}", "CAN", "Pending", "Lines");
    println!("{}", "-".repeat(60));
    for entry in &aggregation {
        println!(
            "{:<30} {:>20} {:>7}",
            entry.can.label(),
            entry.pending_amount.format_with_symbol(symbol),
            entry.count
        );
    }
    println!("{}", "-".repeat(60));
    println!(
        "{:<30} {:>20}",
        "Total",
        aggregation.total_pending().format_with_symbol(symbol)
    );

    Ok(())
}
