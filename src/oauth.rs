//! Transport error mapping and the Twitch token endpoint exchange.
//!
//! Twitch's token endpoint reports scopes as a JSON array and errors as `{status, message}`,
//! neither of which fits RFC 6749 response types, so exchanges are plain form POSTs decoded here
//! and classified through a [`ProviderStrategy`].

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request as HttpRequestBuilder,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	error::{ConfigError, TransientError, TransportError, truncate_preview},
	http::{HelixHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{GrantType, ProviderErrorContext, ProviderErrorKind, ProviderStrategy},
};

type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Maps HTTP transport failures into session [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport.
	///
	/// `metadata` holds whatever the handle captured before failing.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			other => map_generic_transport_error(meta, other),
		}
	}
}

/// Maps the transport-agnostic [`HttpClientError`] variants.
///
/// Custom mappers can delegate here for everything except their own transport's variant.
pub fn map_generic_transport_error<E>(
	meta: Option<&ResponseMetadata>,
	err: HttpClientError<E>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta_status(meta);

	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).with_status(status).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::network(OpaqueTransportError(message)).with_status(status).into(),
		_ => TransportError::network(OpaqueTransportError("unknown HTTP client error".into()))
			.with_status(status)
			.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	let status = meta_status(meta).or_else(|| err.status().map(|code| code.as_u16()));

	TransportError::from(err).with_status(status).into()
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct OpaqueTransportError(String);

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// New access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, when issued.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime in seconds; `0` or missing means no expiry was reported.
	#[serde(default)]
	pub expires_in: Option<u64>,
	/// Granted scopes.
	#[serde(default)]
	pub scope: ScopeSet,
	/// Token type label (`bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenResponse {
	/// Lifetime as a [`Duration`]; zero when the endpoint reported none.
	pub fn lifetime(&self) -> Result<Duration> {
		let secs = i64::try_from(self.expires_in.unwrap_or_default())
			.map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		Ok(Duration::seconds(secs))
	}
}

#[derive(Debug, Default, Deserialize)]
struct TokenErrorBody {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	status: Option<u16>,
}

/// Client for `{identity}/oauth2/token`.
pub struct TokenEndpoint<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	url: Url,
	client_id: String,
	client_secret: TokenSecret,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
	strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> TokenEndpoint<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a token endpoint client.
	pub fn new(
		url: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
		strategy: Arc<dyn ProviderStrategy>,
	) -> Self {
		Self {
			url,
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
			strategy,
		}
	}

	/// Points the client at another token URL.
	pub fn set_url(&mut self, url: Url) {
		self.url = url;
	}

	/// Replaces the error classification strategy.
	pub fn set_strategy(&mut self, strategy: Arc<dyn ProviderStrategy>) {
		self.strategy = strategy;
	}

	/// Token URL in use.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Client identifier sent with every exchange.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Posts a grant and decodes the token response.
	///
	/// `params` are appended after `client_id`, `client_secret`, and `grant_type`.
	pub fn exchange<'a>(
		&'a self,
		grant: GrantType,
		params: Vec<(&'static str, String)>,
	) -> ExchangeFuture<'a, TokenResponse> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let request = self.build_request(grant, &params)?;
			let handle = self.http_client.with_metadata(meta.clone());
			let response = handle
				.call(request)
				.await
				.map_err(|err| self.error_mapper.map_transport_error(meta.take().as_ref(), err))?;
			let status = response.status().as_u16();
			let retry_after = meta.take().and_then(|captured| captured.retry_after);

			if !response.status().is_success() {
				return Err(self.classify(grant, status, retry_after, response.body()));
			}

			let mut de = serde_json::Deserializer::from_slice(response.body());

			serde_path_to_error::deserialize(&mut de).map_err(|source| {
				Error::from(TransientError::TokenResponseParse { source, status: Some(status) })
			})
		})
	}

	fn build_request(
		&self,
		grant: GrantType,
		params: &[(&'static str, String)],
	) -> Result<HttpRequest> {
		let mut form = FormSerializer::new(String::new());

		form.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose())
			.append_pair("grant_type", grant.as_str());

		for (key, value) in params {
			form.append_pair(key, value);
		}

		let request = HttpRequestBuilder::builder()
			.method(Method::POST)
			.uri(self.url.as_str())
			.header(ACCEPT, "application/json")
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(form.finish().into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	fn classify(
		&self,
		grant: GrantType,
		status: u16,
		retry_after: Option<Duration>,
		body: &[u8],
	) -> Error {
		let parsed = serde_json::from_slice::<TokenErrorBody>(body).ok();
		let mut ctx = ProviderErrorContext::new(grant).with_http_status(status);

		match &parsed {
			Some(parsed) => {
				if let Some(error) = &parsed.error {
					ctx = ctx.with_oauth_error(error.clone());
				}
				if let Some(description) =
					parsed.error_description.as_ref().or(parsed.message.as_ref())
				{
					ctx = ctx.with_error_description(description.clone());
				}
			},
			None => ctx = ctx.with_body_preview(String::from_utf8_lossy(body).into_owned()),
		}

		let message = ctx
			.error_description
			.clone()
			.or_else(|| ctx.oauth_error.clone())
			.or_else(|| ctx.body_preview.clone())
			.unwrap_or_else(|| format!("HTTP {status}"));
		let status = parsed.and_then(|parsed| parsed.status).unwrap_or(status);

		match self.strategy.classify_token_error(&ctx) {
			ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
			ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
			ProviderErrorKind::Transient => TransientError::TokenEndpoint {
				message: truncate_preview(&message),
				status: Some(status),
				retry_after,
			}
			.into(),
		}
	}
}
impl<C, M> Debug for TokenEndpoint<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpoint")
			.field("url", &self.url.as_str())
			.field("client_id", &self.client_id)
			.finish_non_exhaustive()
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}
