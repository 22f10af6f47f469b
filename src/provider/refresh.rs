//! Refresh token grant for user credentials.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Expiry},
	config::ApiEndpoints,
	error::ConfigError,
	http::HelixHttpClient,
	oauth::{TokenEndpoint, TransportErrorMapper},
	provider::{
		CredentialProvider, DefaultProviderStrategy, GrantType, ProviderFuture, ProviderStrategy,
	},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Refreshes user credentials with their stored refresh secret.
///
/// The new credential keeps the owner identity of the old validation metadata with the freshly
/// reported expiry and scopes, and carries the rotated refresh secret (or the old one when the
/// endpoint did not rotate it).
pub struct RefreshTokenProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	endpoint: TokenEndpoint<C, M>,
}
#[cfg(feature = "reqwest")]
impl RefreshTokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a reqwest-backed provider against Twitch's production token endpoint.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
		Self::with_http_client(
			client_id,
			client_secret,
			super::token_http_client()?,
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> RefreshTokenProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider on a custom transport.
	pub fn with_http_client(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let url = super::token_url(&ApiEndpoints::builder().build()?)?;
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);

		Ok(Self {
			endpoint: TokenEndpoint::new(
				url,
				client_id,
				client_secret,
				http_client,
				error_mapper,
				strategy,
			),
		})
	}

	/// Uses the identity host from `endpoints`.
	pub fn with_endpoints(mut self, endpoints: &ApiEndpoints) -> Result<Self> {
		self.endpoint.set_url(super::token_url(endpoints)?);

		Ok(self)
	}

	/// Overrides how token endpoint failures are classified.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.endpoint.set_strategy(strategy);

		self
	}

	/// Token endpoint client.
	pub fn endpoint(&self) -> &TokenEndpoint<C, M> {
		&self.endpoint
	}
}
impl<C, M> CredentialProvider for RefreshTokenProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn refresh<'a>(&'a self, current: &'a Credential) -> ProviderFuture<'a> {
		Box::pin(async move {
			let refresh_token = current.refresh_token().ok_or(ConfigError::MissingRefreshToken)?;
			let response = self
				.endpoint
				.exchange(GrantType::RefreshToken, vec![(
					"refresh_token",
					refresh_token.expose().to_owned(),
				)])
				.await?;
			let issued_at = OffsetDateTime::now_utc();
			let expires = Expiry::after(issued_at, response.lifetime()?);
			let rotated = response.refresh_token.as_ref().unwrap_or(refresh_token);
			let next = Credential::new(current.kind(), response.access_token.expose())
				.with_refresh_token(rotated.expose());

			Ok(match current.validation() {
				Some(validation) => {
					let scopes = if response.scope.is_empty() {
						validation.scopes.clone()
					} else {
						response.scope.clone()
					};

					next.with_validation(validation.renewed(scopes, expires))
				},
				None => next,
			})
		})
	}
}
impl<C, M> Debug for RefreshTokenProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTokenProvider").field("endpoint", &self.endpoint).finish()
	}
}
