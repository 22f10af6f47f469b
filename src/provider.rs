//! Credential providers: the capability a session uses to mint a replacement credential.
//!
//! [`CredentialProvider`] is the only contract the session relies on. [`RefreshTokenProvider`]
//! (user tokens) and [`ClientCredentialsProvider`] (app tokens) implement it against Twitch's
//! token endpoint; `strategy` classifies that endpoint's failures. Providers never deduplicate
//! concurrent calls; the session guarantees at most one refresh in flight.

pub mod client_credentials;
pub mod refresh;
pub mod strategy;

pub use client_credentials::*;
pub use refresh::*;
pub use strategy::*;

// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ApiEndpoints,
	request::{ApiHost, ApiVersion},
};

/// Boxed future returned by [`CredentialProvider::refresh`].
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<Credential>> + 'a + Send>>;

/// Exchanges the current credential for a new one.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Mints a replacement for `current`.
	///
	/// The returned credential must be of the same kind as `current`.
	fn refresh<'a>(&'a self, current: &'a Credential) -> ProviderFuture<'a>;
}

const TOKEN_PATH: &str = "oauth2/token";

fn token_url(endpoints: &ApiEndpoints) -> Result<Url> {
	endpoints.resolve(ApiHost::Identity, ApiVersion::Unversioned, TOKEN_PATH)
}

#[cfg(feature = "reqwest")]
fn token_http_client() -> Result<crate::http::ReqwestHttpClient> {
	let client = ReqwestClient::builder()
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.map_err(crate::error::ConfigError::from)?;

	Ok(crate::http::ReqwestHttpClient::with_client(client))
}
