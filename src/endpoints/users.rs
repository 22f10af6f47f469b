//! User endpoints.

// self
use crate::{
	_prelude::*,
	auth::UserOrApp,
	decode::{date, tolerant_url},
	request::{Method, Request, RequestDescriptor},
};

/// `GET /helix/users`.
///
/// With neither ids nor logins the token owner is returned (user tokens only; Helix rejects the
/// empty query for app tokens).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetUsers {
	/// User ids to look up.
	pub ids: Vec<String>,
	/// Logins to look up.
	pub logins: Vec<String>,
}
impl GetUsers {
	/// Looks users up by login.
	pub fn by_logins<I, S>(logins: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { ids: Vec::new(), logins: logins.into_iter().map(Into::into).collect() }
	}
}
impl Request for GetUsers {
	type Auth = UserOrApp;
	type Response = Vec<User>;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "users")
			.with_query_list("id", &self.ids)
			.with_query_list("login", &self.logins))
	}
}

/// Twitch user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
	/// User id.
	pub id: String,
	/// Login name.
	pub login: String,
	/// Display name.
	pub display_name: String,
	/// Staff/admin marker; empty for regular users.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// `partner`, `affiliate`, or empty.
	#[serde(default)]
	pub broadcaster_type: String,
	/// Channel description.
	#[serde(default)]
	pub description: String,
	/// Avatar URL.
	#[serde(default, deserialize_with = "tolerant_url::deserialize")]
	pub profile_image_url: Option<Url>,
	/// Offline banner URL.
	#[serde(default, deserialize_with = "tolerant_url::deserialize")]
	pub offline_image_url: Option<Url>,
	/// Email, only with the `user:read:email` scope.
	#[serde(default)]
	pub email: Option<String>,
	/// Account creation time.
	#[serde(deserialize_with = "date::required")]
	pub created_at: OffsetDateTime,
}
