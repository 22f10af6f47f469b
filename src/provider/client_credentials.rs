//! Client credentials grant for app credentials.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind, ScopeSet},
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

/// Mints fresh app credentials through the client credentials grant.
///
/// App tokens carry no owner, so the minted credential has no validation metadata.
/// The `expires_in` of the token response is discarded with it, so sessions holding an app
/// credential never refresh ahead of time and only a 401 triggers a new exchange.
pub struct ClientCredentialsProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	endpoint: TokenEndpoint<C, M>,
	scopes: ScopeSet,
}
#[cfg(feature = "reqwest")]
impl ClientCredentialsProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
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
impl<C, M> ClientCredentialsProvider<C, M>
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
			scopes: ScopeSet::default(),
		})
	}

	/// Requests the given scopes with every exchange.
	pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = scopes;

		self
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
}
impl<C, M> CredentialProvider for ClientCredentialsProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn refresh<'a>(&'a self, current: &'a Credential) -> ProviderFuture<'a> {
		Box::pin(async move {
			if current.kind() != CredentialKind::App {
				return Err(ConfigError::CredentialKindMismatch {
					expected: CredentialKind::App,
					actual: current.kind(),
				}
				.into());
			}

			let mut params = Vec::new();

			if !self.scopes.is_empty() {
				params.push(("scope", self.scopes.normalized()));
			}

			let response = self.endpoint.exchange(GrantType::ClientCredentials, params).await?;

			Ok(Credential::app(response.access_token.expose()))
		})
	}
}
impl<C, M> Debug for ClientCredentialsProvider<C, M>
where
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsProvider")
			.field("endpoint", &self.endpoint)
			.field("scopes", &self.scopes)
			.finish()
	}
}
