//! Descriptor to HTTP request serialization.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		HeaderValue, Request as HttpRequestBuilder,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ApiEndpoints,
	error::ConfigError,
	request::{ApiHost, RequestDescriptor},
};

const CLIENT_ID_HEADER: &str = "Client-Id";
const JSON: &str = "application/json";

/// Builds the wire request for one attempt.
///
/// Query parameters keep insertion order and absent values are skipped. The identity host
/// expects `Authorization: OAuth <token>`; the API hosts expect `Bearer`.
pub(crate) fn build(
	endpoints: &ApiEndpoints,
	client_id: &str,
	descriptor: &RequestDescriptor,
	credential: &Credential,
) -> Result<HttpRequest> {
	let mut url = endpoints.resolve(descriptor.host(), descriptor.version(), descriptor.path())?;

	if !descriptor.query().is_empty() {
		url.query_pairs_mut().extend_pairs(descriptor.query().present());
	}

	let scheme = match descriptor.host() {
		ApiHost::Identity => "OAuth",
		ApiHost::Helix | ApiHost::Legacy => "Bearer",
	};
	let mut authorization =
		HeaderValue::try_from(format!("{scheme} {}", credential.access_token().expose()))
			.map_err(|e| ConfigError::HttpRequest(e.into()))?;

	authorization.set_sensitive(true);

	let builder = HttpRequestBuilder::builder()
		.method(descriptor.method().clone())
		.uri(url.as_str())
		.header(ACCEPT, JSON)
		.header(CLIENT_ID_HEADER, client_id)
		.header(AUTHORIZATION, authorization);
	let request = match descriptor.body() {
		Some(body) => builder
			.header(CONTENT_TYPE, JSON)
			.body(serde_json::to_vec(body).map_err(ConfigError::BodyEncode)?),
		None => builder.body(Vec::new()),
	};

	Ok(request.map_err(ConfigError::from)?)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::{UserOnly, UserOrApp},
		request::{ApiVersion, Method},
	};

	fn endpoints() -> ApiEndpoints {
		ApiEndpoints::builder().build().expect("Default endpoints should validate.")
	}

	#[test]
	fn query_keeps_order_and_skips_absent_values() {
		let descriptor = RequestDescriptor::for_policy::<UserOrApp>(Method::GET, "streams")
			.with_query("user_login", Some("a"))
			.with_query("game_id", None::<&str>)
			.with_query_list("user_login", ["b", "c"])
			.with_query("language", None::<&str>)
			.with_query("first", Some(5));
		let request = build(&endpoints(), "cid", &descriptor, &Credential::app("tok"))
			.expect("Request should build.");

		assert_eq!(
			request.uri().to_string(),
			"https://api.twitch.tv/helix/streams?user_login=a&user_login=b&user_login=c&first=5"
		);
		assert!(request.body().is_empty());
		assert!(request.headers().get(CONTENT_TYPE).is_none());
	}

	#[test]
	fn headers_carry_client_id_and_bearer_token() {
		let descriptor =
			RequestDescriptor::for_policy::<UserOnly>(Method::POST, "channels/commercial")
				.with_json_body(&json!({ "broadcaster_id": "123", "length": 30 }))
				.expect("Fixture body should encode.");
		let request = build(&endpoints(), "cid", &descriptor, &Credential::user("tok"))
			.expect("Request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
		assert_eq!(request.headers()[CLIENT_ID_HEADER], "cid");
		assert_eq!(request.headers()[CONTENT_TYPE], JSON);
		assert_eq!(
			serde_json::from_slice::<serde_json::Value>(request.body())
				.expect("Body should be JSON."),
			json!({ "broadcaster_id": "123", "length": 30 })
		);
	}

	#[test]
	fn identity_host_uses_oauth_scheme() {
		let descriptor = RequestDescriptor::for_policy::<UserOrApp>(Method::GET, "oauth2/validate")
			.with_host(ApiHost::Identity)
			.with_version(ApiVersion::Unversioned);
		let request = build(&endpoints(), "cid", &descriptor, &Credential::user("tok"))
			.expect("Request should build.");

		assert_eq!(request.uri().to_string(), "https://id.twitch.tv/oauth2/validate");
		assert_eq!(request.headers()[AUTHORIZATION], "OAuth tok");
	}
}
