//! One-element arrays unwrapped into their element.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Decodes `[value]` into `value`.
///
/// An empty array or one with more than one element is a decode failure; the surplus is never
/// silently dropped.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	match <[T; 1]>::try_from(<Vec<T>>::deserialize(deserializer)?) {
		Ok([value]) => Ok(value),
		Err(values) =>
			Err(DeError::invalid_length(values.len(), &"an array with exactly one element")),
	}
}
