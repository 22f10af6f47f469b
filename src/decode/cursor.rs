//! Opaque forward pagination cursor.

// crates.io
use serde::Deserializer;
use serde_json::Value;
// self
use crate::_prelude::*;

/// Cursor pointing at the next page of a paginated response.
///
/// Only present when more results exist; an absent cursor means the last page was reached.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);
impl Cursor {
	/// Wraps a raw cursor; empty strings are not cursors.
	pub fn new(raw: impl Into<String>) -> Option<Self> {
		let raw = raw.into();

		if raw.is_empty() { None } else { Some(Self(raw)) }
	}

	/// Raw cursor string, as sent back in the `after` parameter.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Reads `pagination.cursor` out of a response document.
	pub fn from_envelope(document: &Value) -> Option<Self> {
		document.get("pagination")?.get("cursor")?.as_str().and_then(Self::new)
	}
}
impl Debug for Cursor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Cursor").field(&self.0).finish()
	}
}
impl Display for Cursor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// `pagination` member of a Helix response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
	/// Next-page cursor.
	#[serde(default, deserialize_with = "deserialize_cursor")]
	pub cursor: Option<Cursor>,
}

/// Decodes a cursor, treating `null` and `""` as absent.
pub fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<Cursor>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(<Option<String>>::deserialize(deserializer)?.and_then(Cursor::new))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn empty_cursor_means_last_page() {
		assert_eq!(Cursor::from_envelope(&json!({ "pagination": { "cursor": "" } })), None);
		assert_eq!(Cursor::from_envelope(&json!({ "pagination": {} })), None);
		assert_eq!(Cursor::from_envelope(&json!({ "data": [] })), None);
		assert_eq!(
			Cursor::from_envelope(&json!({ "pagination": { "cursor": "eyJiIjp7fX0" } }))
				.map(|cursor| cursor.to_string()),
			Some("eyJiIjp7fX0".to_owned())
		);
	}

	#[test]
	fn pagination_member_decodes_leniently() {
		let empty: Pagination =
			serde_json::from_str(r#"{"cursor":""}"#).expect("Empty cursor should decode.");
		let null: Pagination =
			serde_json::from_str(r#"{"cursor":null}"#).expect("Null cursor should decode.");
		let set: Pagination =
			serde_json::from_str(r#"{"cursor":"abc"}"#).expect("Cursor should decode.");

		assert_eq!(empty.cursor, None);
		assert_eq!(null.cursor, None);
		assert_eq!(set.cursor.as_ref().map(Cursor::as_str), Some("abc"));
	}
}
