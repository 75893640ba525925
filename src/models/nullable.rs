//! Serde helpers for upstream records that send `null` for missing data

use serde::{Deserialize, Deserializer};

/// Deserialize a field, treating an explicit `null` like a missing key
///
/// Pair with `#[serde(default)]` so absent keys take the same default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
