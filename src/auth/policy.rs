//! Credential compatibility rules.
//!
//! Every request declares which credential kinds it accepts. Sessions are typed by the kind they
//! hold ([`UserToken`] or [`AppToken`]) and requests by a marker policy ([`UserOnly`], [`AppOnly`],
//! [`UserOrApp`], [`NoCredential`]); the [`Permits`] bound rejects mismatched pairs at compile
//! time. [`resolve`] repeats the check at dispatch time for descriptors built at runtime and for
//! credentials swapped in after construction.

// self
use crate::{_prelude::*, auth::CredentialKind};

/// Two-flag capability declared by a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialCompatibility {
	/// The request may be executed with a user access token.
	pub user_token_allowed: bool,
	/// The request may be executed with an app access token.
	pub app_token_allowed: bool,
}
impl CredentialCompatibility {
	/// Accepts user access tokens only.
	pub const USER_ONLY: Self = Self { user_token_allowed: true, app_token_allowed: false };
	/// Accepts app access tokens only.
	pub const APP_ONLY: Self = Self { user_token_allowed: false, app_token_allowed: true };
	/// Accepts either kind.
	pub const USER_OR_APP: Self = Self { user_token_allowed: true, app_token_allowed: true };
	/// Accepts neither kind.
	pub const NONE: Self = Self { user_token_allowed: false, app_token_allowed: false };

	/// Returns true if a credential of `kind` may execute the request.
	pub const fn allows(self, kind: CredentialKind) -> bool {
		match kind {
			CredentialKind::User => self.user_token_allowed,
			CredentialKind::App => self.app_token_allowed,
		}
	}
}
impl Display for CredentialCompatibility {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match (self.user_token_allowed, self.app_token_allowed) {
			(true, true) => f.write_str("user or app tokens"),
			(true, false) => f.write_str("user tokens only"),
			(false, true) => f.write_str("app tokens only"),
			(false, false) => f.write_str("no tokens"),
		}
	}
}

/// Checks a request's declared compatibility against the session's credential kind.
///
/// Runs before any I/O; a rejection never consumes the call's refresh-and-retry.
pub fn resolve(compatibility: CredentialCompatibility, kind: CredentialKind) -> Result<()> {
	if compatibility.allows(kind) {
		Ok(())
	} else {
		Err(Error::IncompatibleCredential { kind, compatibility })
	}
}

/// Type-level credential kind a session is bound to.
pub trait AuthKind
where
	Self: 'static + Send + Sync,
{
	/// Runtime kind matching the marker.
	const KIND: CredentialKind;
}

/// Marker for sessions holding a user access token.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserToken;
impl AuthKind for UserToken {
	const KIND: CredentialKind = CredentialKind::User;
}

/// Marker for sessions holding an app access token.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppToken;
impl AuthKind for AppToken {
	const KIND: CredentialKind = CredentialKind::App;
}

/// Type-level compatibility declared by a request.
pub trait AuthPolicy {
	/// Runtime flags matching the marker.
	const COMPATIBILITY: CredentialCompatibility;
}

/// Implemented for every policy that accepts credentials of kind `K`.
pub trait Permits<K>
where
	Self: AuthPolicy,
	K: AuthKind,
{
}

/// Requests that require a user access token.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserOnly;
impl AuthPolicy for UserOnly {
	const COMPATIBILITY: CredentialCompatibility = CredentialCompatibility::USER_ONLY;
}
impl Permits<UserToken> for UserOnly {}

/// Requests that require an app access token.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppOnly;
impl AuthPolicy for AppOnly {
	const COMPATIBILITY: CredentialCompatibility = CredentialCompatibility::APP_ONLY;
}
impl Permits<AppToken> for AppOnly {}

/// Requests that accept either token kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserOrApp;
impl AuthPolicy for UserOrApp {
	const COMPATIBILITY: CredentialCompatibility = CredentialCompatibility::USER_OR_APP;
}
impl Permits<UserToken> for UserOrApp {}
impl Permits<AppToken> for UserOrApp {}

/// Requests that accept no token kind; they can only be dispatched as raw descriptors, where
/// [`resolve`] rejects them.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCredential;
impl AuthPolicy for NoCredential {
	const COMPATIBILITY: CredentialCompatibility = CredentialCompatibility::NONE;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rule_table_matches_every_combination() {
		let cases = [
			(CredentialCompatibility::USER_ONLY, CredentialKind::User, true),
			(CredentialCompatibility::USER_ONLY, CredentialKind::App, false),
			(CredentialCompatibility::APP_ONLY, CredentialKind::App, true),
			(CredentialCompatibility::APP_ONLY, CredentialKind::User, false),
			(CredentialCompatibility::USER_OR_APP, CredentialKind::User, true),
			(CredentialCompatibility::USER_OR_APP, CredentialKind::App, true),
			(CredentialCompatibility::NONE, CredentialKind::User, false),
			(CredentialCompatibility::NONE, CredentialKind::App, false),
		];

		for (compatibility, kind, allowed) in cases {
			let outcome = resolve(compatibility, kind);

			assert_eq!(outcome.is_ok(), allowed, "{compatibility} with a {kind} credential");

			if !allowed {
				assert!(matches!(
					outcome,
					Err(Error::IncompatibleCredential { kind: k, compatibility: c })
						if k == kind && c == compatibility
				));
			}
		}
	}

	#[test]
	fn markers_expose_matching_flags() {
		assert_eq!(UserOnly::COMPATIBILITY, CredentialCompatibility::USER_ONLY);
		assert_eq!(AppOnly::COMPATIBILITY, CredentialCompatibility::APP_ONLY);
		assert_eq!(UserOrApp::COMPATIBILITY, CredentialCompatibility::USER_OR_APP);
		assert_eq!(NoCredential::COMPATIBILITY, CredentialCompatibility::NONE);
		assert_eq!(UserToken::KIND, CredentialKind::User);
		assert_eq!(AppToken::KIND, CredentialKind::App);
	}
}
