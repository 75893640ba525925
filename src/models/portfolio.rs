//! Portfolio and procurement shop models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fee::FeeRate;
use super::ids::{PortfolioId, ProcurementShopId};
use super::nullable::null_as_default;

/// A portfolio groups CANs for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: PortfolioId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl Portfolio {
    pub fn new(id: PortfolioId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: None,
        }
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.abbreviation {
            Some(abbr) => write!(f, "{} ({})", self.name, abbr),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A procurement shop (awarding entity) and its published fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementShop {
    pub id: ProcurementShopId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Whole percentage, e.g. `4.8` for 4.8%
    #[serde(default, deserialize_with = "null_as_default")]
    pub fee_percentage: Decimal,
}

impl ProcurementShop {
    /// The shop's fee as a canonical fraction
    pub fn fee_rate(&self) -> FeeRate {
        FeeRate::from_percent(self.fee_percentage)
    }
}

impl fmt::Display for ProcurementShop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.abbreviation {
            Some(abbr) => write!(f, "{} ({})", self.name, abbr),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_display() {
        let mut portfolio = Portfolio::new(PortfolioId::new(1), "Child Welfare Research");
        assert_eq!(portfolio.to_string(), "Child Welfare Research");
        portfolio.abbreviation = Some("CWR".into());
        assert_eq!(portfolio.to_string(), "Child Welfare Research (CWR)");
    }

    #[test]
    fn test_shop_fee_rate() {
        let shop: ProcurementShop =
            serde_json::from_str(r#"{"id": 2, "name": "Government Contracting Services", "fee_percentage": 4.8}"#)
                .unwrap();
        assert_eq!(shop.fee_rate().fraction(), dec!(0.048));
        assert_eq!(shop.to_string(), "Government Contracting Services");
    }
}
