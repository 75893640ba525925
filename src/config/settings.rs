//! User settings for can-review
//!
//! Defaults for the review view, the portfolio key used when grouping CANs,
//! and the log filter.

use serde::{Deserialize, Serialize};

use super::paths::ReviewPaths;
use crate::error::ReviewError;
use crate::models::PortfolioKey;
use crate::services::ChangeView;
use crate::storage::write_json_atomic;

/// User settings for can-review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// View used when the command line names none
    #[serde(default)]
    pub default_view: ChangeView,

    /// CAN field that carries the portfolio reference
    #[serde(default)]
    pub portfolio_key: PortfolioKey,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_view: ChangeView::default(),
            portfolio_key: PortfolioKey::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if there is no file
    ///
    /// Defaults are not written; the caller decides when to persist.
    pub fn load_or_default(paths: &ReviewPaths) -> Result<Self, ReviewError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| ReviewError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ReviewError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReviewPaths) -> Result<(), ReviewError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
