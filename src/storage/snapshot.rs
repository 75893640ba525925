//! Review snapshots
//!
//! A snapshot bundles the budget lines under review with the portfolio and
//! procurement shop records needed to label and price them.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{read_json_required, read_yaml_required};
use crate::error::{ReviewError, ReviewResult};
use crate::models::nullable::null_as_default;
use crate::models::{BudgetLine, BudgetLineId, Portfolio, ProcurementShop, ProcurementShopId};

/// Budget lines plus the reference records they point at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget_lines: Vec<BudgetLine>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub portfolios: Vec<Portfolio>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub procurement_shops: Vec<ProcurementShop>,
}

/// A problem found in one budget line of a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIssue {
    pub budget_line_id: BudgetLineId,
    pub problem: String,
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.budget_line_id, self.problem)
    }
}

impl ReviewSnapshot {
    /// Load a snapshot, choosing the parser from the file extension
    ///
    /// `.yaml` and `.yml` are read as YAML; anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> ReviewResult<Self> {
        let path = path.as_ref();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let snapshot: Self = if is_yaml {
            read_yaml_required(path)?
        } else {
            read_json_required(path)?
        };

        debug!(
            path = %path.display(),
            budget_lines = snapshot.budget_lines.len(),
            portfolios = snapshot.portfolios.len(),
            procurement_shops = snapshot.procurement_shops.len(),
            "loaded review snapshot"
        );

        Ok(snapshot)
    }

    /// Find a procurement shop by id
    pub fn procurement_shop(&self, id: ProcurementShopId) -> ReviewResult<&ProcurementShop> {
        self.procurement_shops
            .iter()
            .find(|shop| shop.id == id)
            .ok_or_else(|| ReviewError::procurement_shop_not_found(id.to_string()))
    }

    /// Collect the problems of every line, in input order
    ///
    /// Invalid lines are still aggregated; this only reports them.
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();

        for line in &self.budget_lines {
            if let Err(err) = line.validate() {
                issues.push(SnapshotIssue {
                    budget_line_id: line.id,
                    problem: err.to_string(),
                });
            }

            for change_request in line.pending_change_requests() {
                if let Some(shop_id) = change_request
                    .requested_change_diff
                    .awarding_entity_id
                    .as_ref()
                    .and_then(|change| change.new)
                {
                    if self.procurement_shop(shop_id).is_err() {
                        issues.push(SnapshotIssue {
                            budget_line_id: line.id,
                            problem: format!(
                                "{} requests unknown procurement shop {}",
                                change_request.id, shop_id
                            ),
                        });
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CanId, ChangeRequest, ChangeRequestId, FeeRate, FieldChange, Money, RequestedChangeDiff,
    };
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    const SNAPSHOT_JSON: &str = r#"{
        "budget_lines": [
            {
                "id": 1,
                "can_id": 502,
                "amount": 700000,
                "proc_shop_fee_percentage": 0.005,
                "status": "PLANNED"
            },
            {
                "id": 2,
                "can_id": 512,
                "amount": 300000.00,
                "proc_shop_fee_percentage": 0.005
            }
        ],
        "portfolios": [{ "id": 1, "name": "Child Welfare Research" }],
        "procurement_shops": [
            { "id": 2, "name": "Government Contracting Services", "abbreviation": "GCS", "fee_percentage": 0.5 }
        ]
    }"#;

    #[test]
    fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(&path, SNAPSHOT_JSON).unwrap();

        let snapshot = ReviewSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.budget_lines.len(), 2);
        assert_eq!(snapshot.budget_lines[0].amount, Money::from_dollars(700_000));
        assert_eq!(
            snapshot.budget_lines[0].fee_rate(),
            FeeRate::from_fraction(dec!(0.005))
        );
        assert_eq!(snapshot.portfolios[0].name, "Child Welfare Research");
    }

    #[test]
    fn test_load_accepts_null_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{
                "budget_lines": [
                    {
                        "id": 1,
                        "can_id": 502,
                        "amount": null,
                        "status": null,
                        "in_review": null,
                        "proc_shop_fee_percentage": null,
                        "change_requests_in_review": null
                    },
                    {
                        "id": 2,
                        "can_id": 504,
                        "amount": 100,
                        "change_requests_in_review": [
                            {
                                "id": 20,
                                "has_budget_change": null,
                                "has_status_change": null,
                                "has_proc_shop_change": null,
                                "requested_change_diff": null,
                                "status": null
                            }
                        ],
                        "can": {
                            "id": 504,
                            "funding": { "total_funding": null, "available_funding": 40 }
                        }
                    }
                ],
                "portfolios": null,
                "procurement_shops": [{ "id": 3, "name": "IBC", "fee_percentage": null }]
            }"#,
        )
        .unwrap();

        let snapshot = ReviewSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.budget_lines.len(), 2);
        assert!(snapshot.portfolios.is_empty());
        assert_eq!(snapshot.budget_lines[0].amount, Money::zero());
        assert!(snapshot.budget_lines[0].change_requests_in_review.is_empty());

        let change_request = &snapshot.budget_lines[1].change_requests_in_review[0];
        assert!(change_request.is_in_review());
        assert!(change_request.requested_change_diff.is_empty());

        let funding = snapshot.budget_lines[1].can.as_ref().and_then(|can| can.funding.clone());
        let funding = funding.unwrap();
        assert_eq!(funding.total_funding, Money::zero());
        assert_eq!(funding.available_funding, Money::from_dollars(40));
        assert_eq!(snapshot.procurement_shops[0].fee_rate(), FeeRate::ZERO);
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.yml");
        fs::write(
            &path,
            "budget_lines:\n  - id: 7\n    can_id: 504\n    amount: 250\nprocurement_shops: []\n",
        )
        .unwrap();

        let snapshot = ReviewSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.budget_lines[0].can_id, Some(CanId::new(504)));
        assert!(snapshot.portfolios.is_empty());
    }

    #[test]
    fn test_procurement_shop_lookup() {
        let snapshot: ReviewSnapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();

        let shop = snapshot.procurement_shop(ProcurementShopId::new(2)).unwrap();
        assert_eq!(shop.fee_rate(), FeeRate::from_fraction(dec!(0.005)));

        let err = snapshot.procurement_shop(ProcurementShopId::new(9)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validate_reports_problems_per_line() {
        let mut snapshot: ReviewSnapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();
        assert!(snapshot.validate().is_empty());

        snapshot.budget_lines[1].amount = Money::from_dollars(-5);
        snapshot.budget_lines[0] = snapshot.budget_lines[0]
            .clone()
            .with_change_request(ChangeRequest::proc_shop_change(
                ChangeRequestId::new(40),
                BudgetLineId::new(1),
                RequestedChangeDiff {
                    awarding_entity_id: Some(FieldChange::new(
                        ProcurementShopId::new(2),
                        ProcurementShopId::new(99),
                    )),
                    ..Default::default()
                },
            ));

        let issues = snapshot.validate();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].budget_line_id, BudgetLineId::new(1));
        assert!(issues[0].problem.contains("unknown procurement shop"));
        assert_eq!(issues[1].budget_line_id, BudgetLineId::new(2));
        assert!(issues[1].problem.contains("negative"));
    }
}
