//! Channel endpoints.

// self
use crate::{
	_prelude::*,
	auth::{UserOnly, UserOrApp},
	decode::collection,
	request::{IdentityField, Method, Request, RequestDescriptor, ResponseShape},
};

/// `POST /helix/channels/commercial`.
///
/// Leave `broadcaster_id` empty to run the commercial on the token owner's channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StartCommercial {
	/// Channel to run the commercial on.
	pub broadcaster_id: String,
	/// Requested length in seconds (30 to 180).
	pub length: u32,
}
impl StartCommercial {
	/// Commercial on the token owner's channel.
	pub fn new(length: u32) -> Self {
		Self { broadcaster_id: String::new(), length }
	}

	/// Commercial on an explicit channel.
	pub fn for_broadcaster(broadcaster_id: impl Into<String>, length: u32) -> Self {
		Self { broadcaster_id: broadcaster_id.into(), length }
	}
}
impl Request for StartCommercial {
	type Auth = UserOnly;
	type Response = Commercial;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::POST, "channels/commercial")
			.with_json_body(self)?
			.with_shape(ResponseShape::SingleData)
			.with_identity(IdentityField::body("broadcaster_id")))
	}
}

/// Result of starting a commercial.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Commercial {
	/// Length actually granted, in seconds.
	pub length: u32,
	/// Explanation when the request was trimmed or refused.
	#[serde(default)]
	pub message: String,
	/// Seconds until another commercial may run.
	pub retry_after: u32,
}

/// `GET /helix/channels`.
///
/// With no ids the token owner's channel is requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetChannelInformation {
	/// Channels to look up (up to 100).
	pub broadcaster_ids: Vec<String>,
}
impl Request for GetChannelInformation {
	type Auth = UserOrApp;
	type Response = Vec<ChannelInformation>;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "channels")
			.with_query_list("broadcaster_id", &self.broadcaster_ids)
			.with_identity(IdentityField::query("broadcaster_id")))
	}
}

/// Channel metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChannelInformation {
	/// Channel owner id.
	pub broadcaster_id: String,
	/// Channel owner login.
	pub broadcaster_login: String,
	/// Channel owner display name.
	pub broadcaster_name: String,
	/// ISO 639-1 language code.
	#[serde(default)]
	pub broadcaster_language: String,
	/// Current category id.
	#[serde(default)]
	pub game_id: String,
	/// Current category name.
	#[serde(default)]
	pub game_name: String,
	/// Stream title.
	#[serde(default)]
	pub title: String,
	/// Broadcast delay in seconds.
	#[serde(default)]
	pub delay: u32,
	/// Channel tags.
	#[serde(default, deserialize_with = "collection::null_as_empty")]
	pub tags: Vec<String>,
}
