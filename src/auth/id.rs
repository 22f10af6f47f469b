//! Twitch identifiers carried in credential validation metadata.
//!
//! User ids are decimal strings; client ids are short ASCII tokens. Both are checked once on
//! construction so identity injection can write them into requests verbatim.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const USER_ID_MAX_LEN: usize = 32;
const CLIENT_ID_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} id cannot be empty.")]
	Empty {
		/// Identifier kind (`user` or `client`).
		kind: &'static str,
	},
	/// The identifier contains a character outside its alphabet.
	#[error("{kind} id contains an invalid character {found:?}.")]
	InvalidCharacter {
		/// Identifier kind (`user` or `client`).
		kind: &'static str,
		/// First offending character.
		found: char,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} id exceeds {max} characters.")]
	TooLong {
		/// Identifier kind (`user` or `client`).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

struct Rules {
	kind: &'static str,
	max: usize,
	allowed: fn(char) -> bool,
}
impl Rules {
	fn check(&self, value: &str) -> Result<(), IdentifierError> {
		let kind = self.kind;

		if value.is_empty() {
			return Err(IdentifierError::Empty { kind });
		}
		if let Some(found) = value.chars().find(|c| !(self.allowed)(*c)) {
			return Err(IdentifierError::InvalidCharacter { kind, found });
		}
		if value.len() > self.max {
			return Err(IdentifierError::TooLong { kind, max: self.max });
		}

		Ok(())
	}
}

macro_rules! twitch_id {
	($(#[$meta:meta])* $name:ident, $rules:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			const RULES: Rules = $rules;

			/// Validates and wraps an identifier.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				Self::RULES.check(&value)?;

				Ok(Self(value))
			}

			/// Identifier as sent on the wire.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", stringify!($name), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

twitch_id! {
	/// Numeric id of the Twitch user that owns a user access token.
	UserId,
	Rules { kind: "User", max: USER_ID_MAX_LEN, allowed: |c| c.is_ascii_digit() }
}
twitch_id! {
	/// Id of the Twitch application a token was issued to.
	ClientId,
	Rules {
		kind: "Client",
		max: CLIENT_ID_MAX_LEN,
		allowed: |c| c.is_ascii_alphanumeric() || c == '-' || c == '_',
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_ids_are_numeric() {
		let user = UserId::new("141981764").expect("Numeric user id should be valid.");

		assert_eq!(user.as_str(), "141981764");
		assert_eq!(format!("{user:?}"), "UserId(141981764)");
		assert_eq!(UserId::new(""), Err(IdentifierError::Empty { kind: "User" }));
		assert_eq!(
			UserId::new(" 123"),
			Err(IdentifierError::InvalidCharacter { kind: "User", found: ' ' })
		);
		assert!(UserId::new("twitchdev").is_err());
	}

	#[test]
	fn client_ids_reject_whitespace_and_oversized_values() {
		assert!(ClientId::new("wbmytr93xzw8zbg0p1izqyzzc5mbiz").is_ok());
		assert!(ClientId::new("client id").is_err());
		assert_eq!(
			ClientId::new("a".repeat(CLIENT_ID_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { kind: "Client", max: CLIENT_ID_MAX_LEN })
		);
	}

	#[test]
	fn serde_and_borrow_use_the_raw_string() {
		let user: UserId = serde_json::from_str("\"42\"").expect("User id should deserialize.");
		let lookup = HashMap::from([(user.clone(), 7_u8)]);

		assert_eq!(lookup.get("42"), Some(&7));
		assert_eq!(serde_json::to_string(&user).expect("User id should serialize."), "\"42\"");
		assert!(serde_json::from_str::<UserId>("\"4 2\"").is_err());
	}
}
