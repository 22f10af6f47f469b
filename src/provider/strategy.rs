//! Token endpoint error classification.
//!
//! Twitch answers failed exchanges with `{status, message}` ("Invalid refresh token", "invalid
//! client secret") while RFC 6749 servers use `{error, error_description}`. Strategies see both
//! through [`ProviderErrorContext`] and decide which [`ProviderErrorKind`] the failure is.

// self
use crate::{_prelude::*, error::truncate_preview};

/// Grants the session's providers exchange at the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Refresh token grant for user credentials.
	RefreshToken,
	/// Client credentials grant for app credentials.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Classifies failed token exchanges.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed exchange into the session's error taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Canonical token endpoint failure categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// The refresh token is invalid, expired, or revoked.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Failure is temporary and may be retried.
	Transient,
}

/// Primitive data describing a failed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Grant type of the failing request.
	pub grant_type: GrantType,
	/// HTTP status code, when available.
	pub http_status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` or Twitch `message` field.
	pub error_description: Option<String>,
	/// Preview of a body that was not JSON.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	/// Creates a new context scoped to the provided grant type.
	pub fn new(grant_type: GrantType) -> Self {
		Self {
			grant_type,
			http_status: None,
			oauth_error: None,
			error_description: None,
			body_preview: None,
		}
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the human-readable description.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a truncated body preview.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(&body.into()));

		self
	}
}

/// Strategy tuned for Twitch's identity service.
///
/// Structured OAuth codes win, then message text (Twitch spells codes with spaces, e.g.
/// "invalid client"), and finally the HTTP status.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		ctx.oauth_error
			.as_deref()
			.and_then(classify_text)
			.or_else(|| ctx.error_description.as_deref().and_then(classify_text))
			.or_else(|| ctx.body_preview.as_deref().and_then(classify_text))
			.unwrap_or_else(|| classify_status(ctx.http_status))
	}
}

fn classify_text(text: &str) -> Option<ProviderErrorKind> {
	let normalized = text.to_ascii_lowercase().replace(' ', "_");

	match normalized.as_str() {
		text if text.contains("invalid_refresh_token")
			|| text.contains("invalid_grant")
			|| text.contains("access_denied") =>
			Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") || text.contains("unauthorized_client") =>
			Some(ProviderErrorKind::InvalidClient),
		text if text.contains("temporarily_unavailable") || text.contains("server_error") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401 | 403) => ProviderErrorKind::InvalidClient,
		_ => ProviderErrorKind::Transient,
	}
}
