//! Path management for can-review
//!
//! ## Path Resolution Order
//!
//! 1. `CAN_REVIEW_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/can-review` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::ReviewError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "CAN_REVIEW_DIR";

/// Manages all paths used by can-review
#[derive(Debug, Clone)]
pub struct ReviewPaths {
    base_dir: PathBuf,
}

impl ReviewPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, ReviewError> {
        let base_dir = match std::env::var_os(BASE_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default destination for exported reports
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Ensure the base and exports directories exist
    pub fn ensure_directories(&self) -> Result<(), ReviewError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReviewError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.exports_dir())
            .map_err(|e| ReviewError::Io(format!("Failed to create exports directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, ReviewError> {
    ProjectDirs::from("", "", "can-review")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ReviewError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.exports_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        std::env::set_var(BASE_DIR_ENV, temp_dir.path());
        let paths = ReviewPaths::new().unwrap();
        std::env::remove_var(BASE_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().join("review"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.exports_dir().exists());
    }
}
