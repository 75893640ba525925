//! YAML Export functionality
//!
//! Exports a review report to YAML for human-readable sharing.

use std::io::Write;

use crate::error::{ReviewError, ReviewResult};
use crate::export::json::ReportExport;
use crate::reports::CanReviewReport;

/// Export a report to YAML
pub fn export_report_yaml<W: Write>(report: &CanReviewReport, writer: &mut W) -> ReviewResult<()> {
    let export = ReportExport::new(report);

    writeln!(writer, "# CAN review export").map_err(|e| ReviewError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| ReviewError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ReviewError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ReviewError::Export(e.to_string()))?;

    Ok(())
}
