//! CSV Export functionality
//!
//! Exports one row per CAN of a review report, spreadsheet friendly.

use serde::Serialize;
use std::io::Write;

use crate::error::ReviewResult;
use crate::models::Money;
use crate::reports::CanReviewReport;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Portfolio")]
    portfolio: &'a str,
    #[serde(rename = "CAN ID")]
    can_id: u64,
    #[serde(rename = "CAN")]
    can: &'a str,
    #[serde(rename = "Lines")]
    lines: u32,
    #[serde(rename = "Before")]
    before: String,
    #[serde(rename = "After")]
    after: String,
    #[serde(rename = "Change")]
    change: String,
    #[serde(rename = "Available")]
    available: String,
    #[serde(rename = "Remaining After")]
    remaining_after: String,
}

fn cents(amount: Money) -> String {
    amount.rounded_to_cents().to_string()
}

fn optional_cents(amount: Option<Money>) -> String {
    amount.map(cents).unwrap_or_default()
}

/// Export a report to CSV, one row per CAN
pub fn export_report_csv<W: Write>(report: &CanReviewReport, writer: W) -> ReviewResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for group in &report.groups {
        for row in &group.cans {
            csv_writer.serialize(CsvRow {
                portfolio: &group.portfolio_name,
                can_id: row.can_id.value(),
                can: &row.can_name,
                lines: row.line_count,
                before: cents(row.before),
                after: cents(row.after),
                change: cents(row.delta),
                available: optional_cents(row.available_funding),
                remaining_after: optional_cents(row.remaining_after),
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
