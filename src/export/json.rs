//! JSON Export functionality
//!
//! Exports a review report to JSON, wrapped with a schema version and
//! timestamp so consumers can detect format changes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{ReviewError, ReviewResult};
use crate::reports::CanReviewReport;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper around an exported report
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    pub report: &'a CanReviewReport,
}

impl<'a> ReportExport<'a> {
    pub fn new(report: &'a CanReviewReport) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            report,
        }
    }
}

/// Export a report to JSON
pub fn export_report_json<W: Write>(
    report: &CanReviewReport,
    writer: &mut W,
    pretty: bool,
) -> ReviewResult<()> {
    let export = ReportExport::new(report);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| ReviewError::Export(e.to_string()))?;

    Ok(())
}
