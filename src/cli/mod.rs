//! CLI command handlers
//!
//! Bridges clap argument parsing with the review services.

pub mod inspect;
pub mod report;
pub mod review;

pub use inspect::{handle_changes, handle_check, handle_portfolios, ChangesArgs, PortfoliosArgs};
pub use report::{handle_report, ReportArgs};
pub use review::{handle_review, PageArg, ReviewArgs, ReviewCommandArgs};
