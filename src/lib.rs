//! can-review - pending CAN amounts for agreement budget lines under review
//!
//! Given budget lines with their in-review change requests, this library
//! works out how much each CAN (Common Accounting Number, a funding source)
//! would carry before and after the requests are approved. Amounts include
//! the procurement shop fee. Everything is computed from already-fetched
//! records; nothing here talks to a server.
//!
//! # Architecture
//!
//! - `models`: budget lines, change requests, CANs, portfolios, money
//! - `services`: fee math, change resolution, per-CAN aggregation, portfolios
//! - `reports`: before/after report grouped by portfolio
//! - `export`: CSV, JSON and YAML report export
//! - `storage`: snapshot loading and atomic JSON writes
//! - `config`: path resolution and user settings
//! - `cli`: command handlers for the `can-review` binary
//!
//! # Example
//!
//! ```
//! use can_review::models::{BudgetLine, BudgetLineId, CanId, FeeRate, Money};
//! use can_review::services::{aggregate, AggregationOptions, ChangeView};
//! use rust_decimal_macros::dec;
//!
//! let lines = vec![
//!     BudgetLine::new(BudgetLineId::new(1), CanId::new(502), Money::from_dollars(700_000))
//!         .with_fee_rate(FeeRate::from_fraction(dec!(0.005))),
//! ];
//!
//! let pending = aggregate(&lines, &AggregationOptions::new(ChangeView::Budget));
//! assert_eq!(pending.pending_amount(CanId::new(502)), Money::from_dollars(703_500));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ReviewError, ReviewResult};
