//! Token introspection on the identity host.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, UserOrApp},
	request::{ApiHost, ApiVersion, Method, Request, RequestDescriptor, ResponseShape},
};

/// `GET https://id.twitch.tv/oauth2/validate`.
///
/// Usually called through [`Session::validate`](crate::session::Session::validate), which
/// attaches the result to the session's credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidateToken;
impl Request for ValidateToken {
	type Auth = UserOrApp;
	type Response = ValidatedToken;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "oauth2/validate")
			.with_host(ApiHost::Identity)
			.with_version(ApiVersion::Unversioned)
			.with_shape(ResponseShape::Body))
	}
}

/// Validation payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ValidatedToken {
	/// Application the token was issued to.
	pub client_id: String,
	/// Owner login; absent for app tokens.
	#[serde(default)]
	pub login: Option<String>,
	/// Granted scopes.
	#[serde(default)]
	pub scopes: ScopeSet,
	/// Owner id; absent for app tokens.
	#[serde(default)]
	pub user_id: Option<String>,
	/// Remaining lifetime in seconds; zero for tokens that do not expire.
	#[serde(default)]
	pub expires_in: u64,
}
