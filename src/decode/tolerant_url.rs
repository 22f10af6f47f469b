//! URLs that decode to `None` instead of failing.

// crates.io
use serde::Deserializer;
use serde_json::Value;
// self
use crate::_prelude::*;

/// Parses a URL string, yielding `None` for missing, `null`, empty, non-string, or malformed
/// values.
///
/// Pair with `#[serde(default)]` so an absent field is accepted too.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = <Option<Value>>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::String(raw)) => parse(&raw),
		_ => None,
	})
}

/// Parses `raw` leniently.
pub fn parse(raw: &str) -> Option<Url> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Url::parse(trimmed).ok()
}
