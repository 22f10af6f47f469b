//! Collections that treat `null` as empty.

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

/// Decodes a collection, mapping `null` to its empty value.
///
/// Pair with `#[serde(default)]` to accept a missing field as well.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(<Option<T>>::deserialize(deserializer)?.unwrap_or_default())
}
