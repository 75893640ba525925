//! Strongly-typed ID wrappers for all entity types
//!
//! Records arrive with plain numeric ids. Wrapping them prevents mixing up a
//! CAN id with a budget line id at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate numeric ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an ID from its numeric value
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the underlying numeric value
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(BudgetLineId, "bl-");
define_id!(CanId, "can-");
define_id!(PortfolioId, "pf-");
define_id!(ChangeRequestId, "cr-");
define_id!(AgreementId, "agr-");
define_id!(ProcurementShopId, "shop-");
