//! Core data models for can-review
//!
//! Budget lines, their in-review change requests, the CANs they draw from,
//! and the portfolios and procurement shops around them. All records are
//! supplied already fetched; nothing here performs I/O.

pub mod budget_line;
pub mod can;
pub mod change_request;
pub mod fee;
pub mod ids;
pub mod money;
pub(crate) mod nullable;
pub mod portfolio;

pub use budget_line::{BudgetLine, BudgetLineStatus, BudgetLineValidationError};
pub use can::{Can, CanFunding, PortfolioKey};
pub use change_request::{
    ChangeKind, ChangeRequest, ChangeRequestStatus, FieldChange, RequestedChangeDiff,
};
pub use fee::{FeeRate, FeeRateError};
pub use ids::{
    AgreementId, BudgetLineId, CanId, ChangeRequestId, PortfolioId, ProcurementShopId,
};
pub use money::{Money, MoneyParseError};
pub use portfolio::{Portfolio, ProcurementShop};
