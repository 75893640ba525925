//! CAN (funding allocation) model
//!
//! A CAN is the funding source a budget line draws from. Its funding
//! subtotals are computed upstream; this crate only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CanId, PortfolioId};
use super::money::Money;
use super::nullable::null_as_default;

/// Which CAN field carries the portfolio reference
///
/// Upstream records are inconsistent: some carry `managing_portfolio_id`,
/// others `portfolio_id`. Callers pick the key explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioKey {
    #[default]
    ManagingPortfolioId,
    PortfolioId,
}

impl std::str::FromStr for PortfolioKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "managing_portfolio_id" | "managing" => Ok(Self::ManagingPortfolioId),
            "portfolio_id" | "portfolio" => Ok(Self::PortfolioId),
            other => Err(format!("Unknown portfolio key: {}", other)),
        }
    }
}

/// Funding subtotals for a CAN
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFunding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_funding: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned_funding: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_execution_funding: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub obligated_funding: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_funding: Money,
}

/// A CAN record, as denormalized onto budget lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Can {
    pub id: CanId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_id: Option<PortfolioId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managing_portfolio_id: Option<PortfolioId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<CanFunding>,
}

impl Can {
    /// Placeholder for a CAN that is only known by id (a reassignment target)
    pub fn stub(id: CanId) -> Self {
        Self {
            id,
            display_name: None,
            number: None,
            nick_name: None,
            portfolio_id: None,
            managing_portfolio_id: None,
            funding: None,
        }
    }

    /// Whether this record carries nothing but an id
    pub fn is_stub(&self) -> bool {
        *self == Self::stub(self.id)
    }

    /// Resolve the portfolio reference through the given key
    pub fn portfolio_id_by(&self, key: PortfolioKey) -> Option<PortfolioId> {
        match key {
            PortfolioKey::ManagingPortfolioId => self.managing_portfolio_id,
            PortfolioKey::PortfolioId => self.portfolio_id,
        }
    }

    /// Best available label: display name, then number, then nickname, then id
    pub fn label(&self) -> String {
        self.display_name
            .as_ref()
            .or(self.number.as_ref())
            .or(self.nick_name.as_ref())
            .cloned()
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Funding still available, if known
    pub fn available_funding(&self) -> Option<Money> {
        self.funding.as_ref().map(|f| f.available_funding)
    }
}

impl fmt::Display for Can {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub() {
        let can = Can::stub(CanId::new(512));
        assert!(can.is_stub());
        assert_eq!(can.label(), "can-512");
        assert_eq!(can.available_funding(), None);
    }

    #[test]
    fn test_portfolio_key() {
        let mut can = Can::stub(CanId::new(502));
        can.managing_portfolio_id = Some(PortfolioId::new(1));
        can.portfolio_id = Some(PortfolioId::new(2));

        assert_eq!(
            can.portfolio_id_by(PortfolioKey::ManagingPortfolioId),
            Some(PortfolioId::new(1))
        );
        assert_eq!(can.portfolio_id_by(PortfolioKey::PortfolioId), Some(PortfolioId::new(2)));
        assert!(!can.is_stub());
    }

    #[test]
    fn test_portfolio_key_parse() {
        assert_eq!("portfolio-id".parse::<PortfolioKey>(), Ok(PortfolioKey::PortfolioId));
        assert_eq!(
            "managing_portfolio_id".parse::<PortfolioKey>(),
            Ok(PortfolioKey::ManagingPortfolioId)
        );
        assert!("division".parse::<PortfolioKey>().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let can: Can =
            serde_json::from_str(r#"{"id": 502, "display_name": "G99HRF2", "managing_portfolio_id": 1}"#)
                .unwrap();
        assert_eq!(can.label(), "G99HRF2");
        assert_eq!(can.managing_portfolio_id, Some(PortfolioId::new(1)));
        assert!(can.funding.is_none());
    }
}
