//! Review computations
//!
//! Pure functions over already-fetched records: fee calculation, change
//! request resolution, per-CAN aggregation and portfolio collection. Nothing
//! here performs I/O or returns an error; bad input degrades to empty or
//! default results and is reported through `tracing`.

pub mod aggregate;
pub mod diff;
pub mod fee;
pub mod portfolio;

pub use aggregate::{
    aggregate, aggregate_value, AggregationOptions, CanAggregation, CanPending, ReviewPage,
    StatusAction,
};
pub use diff::{resolve, ChangeView, ResolvedChange};
pub use fee::{amount_with_fee, compute_fee};
pub use portfolio::{collect_portfolios, collect_portfolios_for_cans};
