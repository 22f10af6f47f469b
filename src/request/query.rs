//! Ordered query parameter list.

// self
use crate::_prelude::*;

/// Query parameters kept in insertion order.
///
/// Keys may repeat (Helix expresses list filters as `id=1&id=2`). Entries whose value is absent
/// are kept so identity injection can fill them, but they are never serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);
impl QueryParams {
	/// Creates an empty parameter list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a parameter; `None` marks it absent.
	pub fn push(&mut self, key: impl Into<String>, value: Option<impl Display>) {
		self.0.push((key.into(), value.map(|value| value.to_string())));
	}

	/// Appends one entry per value under the same key.
	pub fn extend<I, V>(&mut self, key: &str, values: I)
	where
		I: IntoIterator<Item = V>,
		V: Display,
	{
		for value in values {
			self.push(key, Some(value));
		}
	}

	/// Returns the first present value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).and_then(|(_, value)| value.as_deref())
	}

	/// Replaces every value stored under `key` with a single entry, keeping the first position.
	pub fn set(&mut self, key: &str, value: impl Display) {
		let value = value.to_string();

		match self.0.iter().position(|(k, _)| k == key) {
			Some(idx) => {
				self.0[idx].1 = Some(value);

				let mut seen = 0_usize;

				self.0.retain(|(k, _)| {
					if k != key {
						return true;
					}

					seen += 1;

					seen == 1
				});
			},
			None => self.0.push((key.to_owned(), Some(value))),
		}
	}

	/// Fills `key` only if it currently holds no value (absent or empty).
	///
	/// Returns `true` when the value was written.
	pub fn fill(&mut self, key: &str, value: &str) -> bool {
		match self.0.iter_mut().find(|(k, _)| k == key) {
			Some((_, slot)) if slot.as_deref().is_some_and(|current| !current.is_empty()) => false,
			Some((_, slot)) => {
				*slot = Some(value.to_owned());

				true
			},
			None => {
				self.0.push((key.to_owned(), Some(value.to_owned())));

				true
			},
		}
	}

	/// Iterates over the parameters that will be sent, in insertion order.
	pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().filter_map(|(key, value)| value.as_deref().map(|value| (key.as_str(), value)))
	}

	/// Returns true when no parameter will be sent.
	pub fn is_empty(&self) -> bool {
		self.present().next().is_none()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn absent_values_are_skipped_and_order_is_kept() {
		let mut query = QueryParams::new();

		query.push("user_login", Some("alpha"));
		query.push("game_id", None::<&str>);
		query.push("user_login", Some("beta"));
		query.push("type", None::<&str>);
		query.push("first", Some(20));

		assert_eq!(
			query.present().collect::<Vec<_>>(),
			vec![("user_login", "alpha"), ("user_login", "beta"), ("first", "20")]
		);
	}

	#[test]
	fn fill_only_writes_unset_values() {
		let mut query = QueryParams::new();

		query.push("broadcaster_id", Some("999"));
		query.push("moderator_id", None::<&str>);
		query.push("user_id", Some(""));

		assert!(!query.fill("broadcaster_id", "123"));
		assert!(query.fill("moderator_id", "123"));
		assert!(query.fill("user_id", "123"));
		assert!(query.fill("after", "abc"));
		assert_eq!(query.get("broadcaster_id"), Some("999"));
		assert_eq!(query.get("moderator_id"), Some("123"));
		assert_eq!(query.get("user_id"), Some("123"));
		assert_eq!(query.get("after"), Some("abc"));
	}

	#[test]
	fn set_collapses_repeated_keys() {
		let mut query = QueryParams::new();

		query.push("after", Some("a"));
		query.push("first", Some(5));
		query.push("after", Some("b"));
		query.set("after", "c");

		assert_eq!(query.present().collect::<Vec<_>>(), vec![("after", "c"), ("first", "5")]);
	}
}
