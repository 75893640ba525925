//! Reports module for can-review
//!
//! Provides the before/after CAN review report built on top of the
//! aggregation services.

pub mod can_review;

pub use can_review::{CanReportRow, CanReviewReport, PortfolioReportRow};
