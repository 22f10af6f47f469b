//! Immutable credential values and their validation metadata.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TokenSecret, UserId},
	provider::{CredentialProvider, ProviderFuture},
};

/// Category of credential a session is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
	/// User access token acting on behalf of a Twitch user.
	User,
	/// App access token minted through the client credentials grant.
	App,
}
impl CredentialKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialKind::User => "user",
			CredentialKind::App => "app",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Expiry reported for a validated credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
	/// The credential stops working at the given instant.
	At(OffsetDateTime),
	/// The provider reported no expiry.
	Never,
}
impl Expiry {
	/// Builds an expiry from a relative `expires_in` value; zero means the token never expires.
	pub fn after(issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		if expires_in.is_zero() { Self::Never } else { Self::At(issued_at + expires_in) }
	}

	/// Returns `true` once `now` reached the expiry instant.
	pub fn is_elapsed(self, now: OffsetDateTime) -> bool {
		match self {
			Self::At(instant) => instant <= now,
			Self::Never => false,
		}
	}
}

/// Owner identity, scopes, and expiry learned from validating a credential.
///
/// A credential either carries a complete [`Validation`] or none at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
	/// User that owns the token.
	pub user_id: UserId,
	/// Application the token was issued to.
	pub client_id: ClientId,
	/// Scopes granted to the token.
	pub scopes: ScopeSet,
	/// When the token stops working.
	pub expires: Expiry,
}
impl Validation {
	/// Creates validation metadata.
	pub fn new(user_id: UserId, client_id: ClientId, scopes: ScopeSet, expires: Expiry) -> Self {
		Self { user_id, client_id, scopes, expires }
	}

	/// Returns a copy with a new expiry and scope set, keeping the owner identity.
	pub fn renewed(&self, scopes: ScopeSet, expires: Expiry) -> Self {
		Self { user_id: self.user_id.clone(), client_id: self.client_id.clone(), scopes, expires }
	}
}

/// Immutable bearer credential plus optional validation metadata.
///
/// Credentials are never mutated once issued. Refreshing produces a new value that replaces the
/// old one wholesale inside the owning session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	kind: CredentialKind,
	validation: Option<Validation>,
}
impl Credential {
	/// Creates a user credential from a raw access token.
	pub fn user(access_token: impl Into<String>) -> Self {
		Self::new(CredentialKind::User, access_token)
	}

	/// Creates an app credential from a raw access token.
	pub fn app(access_token: impl Into<String>) -> Self {
		Self::new(CredentialKind::App, access_token)
	}

	/// Creates a credential of the provided kind.
	pub fn new(kind: CredentialKind, access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			kind,
			validation: None,
		}
	}

	/// Attaches the refresh secret used to mint the next credential.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Attaches validation metadata.
	pub fn with_validation(mut self, validation: Validation) -> Self {
		self.validation = Some(validation);

		self
	}

	/// Bearer secret sent with every request.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Refresh secret, when the credential was issued with one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Credential category.
	pub fn kind(&self) -> CredentialKind {
		self.kind
	}

	/// Validation metadata, when known.
	pub fn validation(&self) -> Option<&Validation> {
		self.validation.as_ref()
	}

	/// Owner of the credential, when validated.
	pub fn user_id(&self) -> Option<&UserId> {
		self.validation.as_ref().map(|validation| &validation.user_id)
	}

	/// Returns `true` if the validated expiry is at or before `now`.
	///
	/// Credentials without validation metadata, or whose provider reported no expiry, never
	/// report themselves as expired; the API's rejection is the only signal for them.
	pub fn is_expired(&self, now: OffsetDateTime) -> bool {
		self.validation.as_ref().is_some_and(|validation| validation.expires.is_elapsed(now))
	}

	/// Exchanges this credential for a new one through `provider`.
	///
	/// The provider does not deduplicate concurrent calls; sessions serialize refreshes
	/// themselves.
	pub fn refresh<'a>(&'a self, provider: &'a dyn CredentialProvider) -> ProviderFuture<'a> {
		provider.refresh(self)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("kind", &self.kind)
			.field("access_token", &self.access_token.fingerprint())
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("validation", &self.validation)
			.finish()
	}
}
