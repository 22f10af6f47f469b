//! API base URLs and their validation.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	request::{ApiHost, ApiVersion},
};

/// Default Helix host.
pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv";
/// Default legacy ingest host.
pub const DEFAULT_LEGACY_URL: &str = "https://ingest.twitch.tv";
/// Default identity host (token validation and exchange).
pub const DEFAULT_IDENTITY_URL: &str = "https://id.twitch.tv";

/// Base URLs for every host a session talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoints {
	/// Helix API base.
	pub helix: Url,
	/// Legacy API base.
	pub legacy: Url,
	/// Identity (OAuth) base.
	pub identity: Url,
}
impl ApiEndpoints {
	/// Creates a builder seeded with Twitch's production hosts.
	pub fn builder() -> ApiEndpointsBuilder {
		ApiEndpointsBuilder::default()
	}

	/// Base URL for `host`.
	pub fn base(&self, host: ApiHost) -> &Url {
		match host {
			ApiHost::Helix => &self.helix,
			ApiHost::Legacy => &self.legacy,
			ApiHost::Identity => &self.identity,
		}
	}

	/// Joins `host`, the version prefix, and `path` into an absolute URL without a query.
	pub fn resolve(&self, host: ApiHost, version: ApiVersion, path: &str) -> Result<Url> {
		let mut url = self.base(host).clone();

		url.set_query(None);
		url.set_fragment(None);

		{
			let mut segments = url.path_segments_mut().map_err(|()| {
				ConfigError::InvalidEndpoint { host: host.as_str(), url: self.base(host).to_string() }
			})?;

			segments.pop_if_empty();

			if let Some(prefix) = version.prefix() {
				segments.push(prefix);
			}

			segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
		}

		Ok(url)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		for host in [ApiHost::Helix, ApiHost::Legacy, ApiHost::Identity] {
			let url = self.base(host);

			if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
				return Err(ConfigError::InvalidEndpoint { host: host.as_str(), url: url.to_string() });
			}
		}

		Ok(())
	}
}

/// Builder for [`ApiEndpoints`]; unset hosts fall back to Twitch's production URLs.
#[derive(Clone, Debug, Default)]
pub struct ApiEndpointsBuilder {
	/// Helix API base override.
	pub helix: Option<Url>,
	/// Legacy API base override.
	pub legacy: Option<Url>,
	/// Identity base override.
	pub identity: Option<Url>,
}
impl ApiEndpointsBuilder {
	/// Overrides the Helix base.
	pub fn helix(mut self, url: Url) -> Self {
		self.helix = Some(url);

		self
	}

	/// Overrides the legacy base.
	pub fn legacy(mut self, url: Url) -> Self {
		self.legacy = Some(url);

		self
	}

	/// Overrides the identity base.
	pub fn identity(mut self, url: Url) -> Self {
		self.identity = Some(url);

		self
	}

	/// Consumes the builder and validates every base URL.
	pub fn build(self) -> Result<ApiEndpoints, ConfigError> {
		let endpoints = ApiEndpoints {
			helix: or_default(self.helix, DEFAULT_HELIX_URL)?,
			legacy: or_default(self.legacy, DEFAULT_LEGACY_URL)?,
			identity: or_default(self.identity, DEFAULT_IDENTITY_URL)?,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}
}

fn or_default(url: Option<Url>, default: &str) -> Result<Url, ConfigError> {
	match url {
		Some(url) => Ok(url),
		None => Ok(Url::parse(default)?),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Fixture URL should parse.")
	}

	#[test]
	fn defaults_point_at_twitch() {
		let endpoints = ApiEndpoints::builder().build().expect("Defaults should validate.");

		assert_eq!(endpoints.helix.as_str(), "https://api.twitch.tv/");
		assert_eq!(endpoints.legacy.as_str(), "https://ingest.twitch.tv/");
		assert_eq!(endpoints.identity.as_str(), "https://id.twitch.tv/");
	}

	#[test]
	fn resolve_applies_version_prefix() {
		let endpoints = ApiEndpoints::builder()
			.helix(url("http://127.0.0.1:8080/mock/"))
			.build()
			.expect("Override should validate.");

		assert_eq!(
			endpoints
				.resolve(ApiHost::Helix, ApiVersion::Helix, "channels/commercial")
				.expect("Helix URL should resolve.")
				.as_str(),
			"http://127.0.0.1:8080/mock/helix/channels/commercial"
		);
		assert_eq!(
			endpoints
				.resolve(ApiHost::Identity, ApiVersion::Unversioned, "/oauth2/validate")
				.expect("Identity URL should resolve.")
				.as_str(),
			"https://id.twitch.tv/oauth2/validate"
		);
	}

	#[test]
	fn rejects_unusable_bases() {
		for raw in ["ftp://api.twitch.tv", "mailto:ops@example.com"] {
			let result = ApiEndpoints::builder().legacy(url(raw)).build();

			assert!(
				matches!(result, Err(ConfigError::InvalidEndpoint { host: "legacy", .. })),
				"{raw} should be rejected"
			);
		}
	}
}
