//! Ingest server listing on the legacy host.

// self
use crate::{
	_prelude::*,
	auth::UserOrApp,
	decode::TemplateUrl,
	request::{ApiHost, ApiVersion, Method, Request, RequestDescriptor, ResponseShape},
};

/// `GET https://ingest.twitch.tv/ingests`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GetIngestServers;
impl Request for GetIngestServers {
	type Auth = UserOrApp;
	type Response = IngestServers;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "ingests")
			.with_host(ApiHost::Legacy)
			.with_version(ApiVersion::Unversioned)
			.with_shape(ResponseShape::Body))
	}
}

/// Ingest listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IngestServers {
	/// Known ingest servers.
	#[serde(default)]
	pub ingests: Vec<Ingest>,
}

/// One RTMP ingest server.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Ingest {
	/// Server id.
	#[serde(rename = "_id")]
	pub id: u64,
	/// Availability indicator between 0 and 1.
	#[serde(default)]
	pub availability: f64,
	/// Whether this is the default server.
	#[serde(default)]
	pub default: bool,
	/// Human readable location.
	pub name: String,
	/// RTMP URL template with a `{stream_key}` placeholder.
	pub url_template: TemplateUrl,
	/// Sort priority.
	#[serde(default)]
	pub priority: i64,
}
