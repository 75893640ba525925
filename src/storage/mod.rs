//! Storage layer for can-review
//!
//! Reads already-fetched review snapshots from disk and writes settings
//! atomically. Domain records are never persisted.

pub mod file_io;
pub mod snapshot;

pub use file_io::{read_json_required, read_yaml_required, write_json_atomic};
pub use snapshot::{ReviewSnapshot, SnapshotIssue};
