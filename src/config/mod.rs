//! Configuration module for can-review
//!
//! Path resolution and persisted user preferences.

pub mod paths;
pub mod settings;

pub use paths::ReviewPaths;
pub use settings::Settings;
