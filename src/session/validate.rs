//! Token validation against the identity host.

// self
use crate::{
	_prelude::*,
	auth::{AuthKind, ClientId, Credential, Expiry, UserId, Validation},
	endpoints::{ValidateToken, ValidatedToken},
	error::ConfigError,
	http::HelixHttpClient,
	oauth::TransportErrorMapper,
	request::Request,
	session::Session,
};

impl<K, C, M> Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validates the current credential and stores its owner, scopes, and expiry.
	///
	/// Tokens without an owner (app tokens) keep their credential unchanged. When the credential
	/// was replaced while validating, the newer credential wins and is returned untouched.
	pub async fn validate(&self) -> Result<Arc<Credential>> {
		let descriptor = ValidateToken.descriptor()?;
		let (response, lease) = self.dispatch::<ValidatedToken>(descriptor).await?;
		let Some(validation) = to_validation(&response.data, OffsetDateTime::now_utc())? else {
			return Ok(lease.credential);
		};
		let validated = (*lease.credential).clone().with_validation(validation);

		Ok(match self.slot.replace_if(lease.generation, validated) {
			Some(updated) => updated.credential,
			None => self.credential(),
		})
	}
}

fn to_validation(token: &ValidatedToken, now: OffsetDateTime) -> Result<Option<Validation>> {
	let Some(user_id) = token.user_id.as_deref().filter(|id| !id.is_empty()) else {
		return Ok(None);
	};
	let expires_in =
		i64::try_from(token.expires_in).map_err(|_| ConfigError::ExpiresInOutOfRange)?;
	let validation = Validation::new(
		UserId::new(user_id).map_err(ConfigError::from)?,
		ClientId::new(&token.client_id).map_err(ConfigError::from)?,
		token.scopes.clone(),
		Expiry::after(now, Duration::seconds(expires_in)),
	);

	Ok(Some(validation))
}
