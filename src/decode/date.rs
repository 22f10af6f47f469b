//! Timestamp and calendar date decoders.
//!
//! Helix reports RFC 3339 timestamps, sometimes with fractional seconds and sometimes without,
//! occasionally only a calendar date, and uses `""` or `null` for "not set".

// crates.io
use serde::{Deserializer, de::Error as DeError};
use time::{Date, format_description::well_known::Rfc3339, macros::format_description};
// self
use crate::_prelude::*;

/// Parses an RFC 3339 timestamp; fractional seconds are optional.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<Date> {
	Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Parses an RFC 3339 timestamp, falling back to a calendar date at midnight UTC.
pub fn parse_flexible(raw: &str) -> Option<OffsetDateTime> {
	parse_timestamp(raw).or_else(|| parse_date(raw).map(|date| date.midnight().assume_utc()))
}

/// Formats an instant as RFC 3339 for query parameters; `None` for years outside 0..=9999.
pub fn format_timestamp(instant: OffsetDateTime) -> Option<String> {
	instant.format(&Rfc3339).ok()
}

/// Required RFC 3339 timestamp.
pub fn required<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse_timestamp(&raw).ok_or_else(|| invalid(&raw, "an RFC 3339 timestamp"))
}

/// Optional RFC 3339 timestamp; `null` and `""` decode to `None`.
///
/// Pair with `#[serde(default)]` so a missing field decodes to `None` as well. A present,
/// non-empty value that does not parse is still an error.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	match <Option<String>>::deserialize(deserializer)? {
		Some(raw) if !raw.trim().is_empty() =>
			parse_timestamp(&raw).map(Some).ok_or_else(|| invalid(&raw, "an RFC 3339 timestamp")),
		_ => Ok(None),
	}
}

/// Required timestamp that may also be a bare calendar date.
pub fn flexible<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse_flexible(&raw).ok_or_else(|| invalid(&raw, "an RFC 3339 timestamp or a YYYY-MM-DD date"))
}

/// Required `YYYY-MM-DD` calendar date.
pub fn calendar<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse_date(&raw).ok_or_else(|| invalid(&raw, "a YYYY-MM-DD date"))
}

fn invalid<E>(raw: &str, expected: &'static str) -> E
where
	E: DeError,
{
	E::invalid_value(serde::de::Unexpected::Str(raw), &expected)
}
