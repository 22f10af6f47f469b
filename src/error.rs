//! Session-level error taxonomy shared by dispatch, providers, and decoding.

// self
use crate::{
	_prelude::*,
	auth::{CredentialCompatibility, CredentialKind},
};

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is terminal for the call that produced it. The dispatcher performs at most one
/// coalesced credential refresh per call and never retries anything else.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The request does not accept the session's credential kind; no I/O was performed.
	#[error("Request does not accept a {kind} credential (accepts {compatibility}).")]
	IncompatibleCredential {
		/// Kind of the credential bound to the session.
		kind: CredentialKind,
		/// Compatibility declared by the request.
		compatibility: CredentialCompatibility,
	},
	/// No response was obtained from the remote side.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The credential was rejected, even after the coalesced refresh.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// The API answered with a non-2xx status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// A 2xx body did not match the declared response shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary token endpoint failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),

	/// Token endpoint rejected the grant (bad or revoked refresh token).
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint rejected the client credentials.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
}

/// Credential rejections that survived the single refresh-and-retry cycle.
#[derive(Debug, ThisError)]
pub enum AuthorizationError {
	/// The API rejected the credential again after it was refreshed.
	#[error("Credential was rejected with HTTP {status} after refreshing it.")]
	Rejected {
		/// HTTP status of the final rejection.
		status: u16,
	},
	/// The API rejected the credential and the session has no provider to refresh it.
	#[error("Credential was rejected with HTTP {status} and no credential provider is configured.")]
	RefreshUnavailable {
		/// HTTP status of the rejection.
		status: u16,
	},
	/// The credential provider failed to mint a replacement.
	#[error("Credential refresh failed.")]
	RefreshFailed {
		/// Provider failure.
		#[source]
		source: Box<Error>,
	},
	/// The coalesced refresh this call waited on failed in another caller.
	#[error("The shared credential refresh failed in a concurrent request.")]
	RefreshAbandoned,
}
impl AuthorizationError {
	/// Wraps a provider failure.
	pub fn refresh_failed(source: Error) -> Self {
		Self::RefreshFailed { source: Box::new(source) }
	}
}

/// Canonical non-2xx response body: `{ error?, status, message }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("API returned HTTP {status}: {message}.")]
pub struct ApiError {
	/// Short error label (usually the HTTP reason phrase).
	#[serde(default)]
	pub error: Option<String>,
	/// HTTP status reported by the API.
	#[serde(default)]
	pub status: u16,
	/// Human-readable message.
	#[serde(default)]
	pub message: String,
	/// Retry-After hint captured from the response headers.
	#[serde(skip)]
	pub retry_after: Option<Duration>,
}
impl ApiError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Decodes an error body, falling back to a body preview when it is not the canonical shape.
	pub fn from_body(status: u16, body: &[u8], retry_after: Option<Duration>) -> Self {
		let mut error = serde_json::from_slice::<Self>(body).unwrap_or_else(|_| Self {
			error: None,
			status,
			message: truncate_preview(&String::from_utf8_lossy(body)),
			retry_after: None,
		});

		if error.status == 0 {
			error.status = status;
		}
		if error.message.is_empty() {
			error.message = truncate_preview(&String::from_utf8_lossy(body));
		}

		error.retry_after = retry_after;

		error
	}
}

/// A 2xx body did not match the declared response shape.
#[derive(Debug, ThisError)]
#[error("Response body with HTTP {status} does not match the declared shape at `{path}`.", path = .source.path())]
pub struct DecodeError {
	/// Structured parsing failure, including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status of the response.
	pub status: u16,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A URL could not be parsed.
	#[error(transparent)]
	InvalidUrl(#[from] url::ParseError),
	/// An API base URL is unusable.
	#[error("The {host} endpoint is not a usable base URL: {url}.")]
	InvalidEndpoint {
		/// Which host failed validation.
		host: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A request body could not be encoded.
	#[error("Request body could not be encoded.")]
	BodyEncode(#[source] serde_json::Error),
	/// The credential does not match the session's credential kind.
	#[error("Session expects a {expected} credential but received a {actual} credential.")]
	CredentialKindMismatch {
		/// Kind the session was typed with.
		expected: CredentialKind,
		/// Kind of the supplied credential.
		actual: CredentialKind,
	},
	/// Credential is missing a refresh secret.
	#[error("Credential is missing a refresh token.")]
	MissingRefreshToken,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Validation payload carried an invalid identifier.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary token endpoint failures (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
		/// HTTP status, when the failure happened after the status line arrived.
		status: Option<u16>,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src), status: None }
	}

	/// Attaches the HTTP status observed before the failure.
	pub fn with_status(self, status: Option<u16>) -> Self {
		match self {
			Self::Network { source, .. } => Self::Network { source, status },
			other => other,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

pub(crate) fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= ApiError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(ApiError::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_decodes_canonical_body() {
		let err = ApiError::from_body(503, br#"{"status":503,"message":"unavailable"}"#, None);

		assert_eq!(err.status, 503);
		assert_eq!(err.message, "unavailable");
		assert_eq!(err.error, None);
	}

	#[test]
	fn api_error_falls_back_to_http_status_and_preview() {
		let err = ApiError::from_body(502, b"<html>bad gateway</html>", None);

		assert_eq!(err.status, 502);
		assert_eq!(err.message, "<html>bad gateway</html>");

		let err = ApiError::from_body(400, br#"{"error":"Bad Request","message":"missing id"}"#, None);

		assert_eq!(err.status, 400);
		assert_eq!(err.error.as_deref(), Some("Bad Request"));
	}

	#[test]
	fn api_error_without_message_keeps_the_body_preview() {
		let err = ApiError::from_body(500, br#"{"detail":"db down"}"#, None);

		assert_eq!(err.status, 500);
		assert_eq!(err.message, r#"{"detail":"db down"}"#);

		let err = ApiError::from_body(500, b"[]", None);

		assert_eq!(err.status, 500);
		assert_eq!(err.message, "[]");
	}

	#[test]
	fn previews_are_truncated() {
		let long = "x".repeat(ApiError::BODY_PREVIEW_LIMIT + 10);
		let preview = truncate_preview(&long);

		assert_eq!(preview.chars().count(), ApiError::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
