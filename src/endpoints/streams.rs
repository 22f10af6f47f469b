//! Stream endpoints.

// self
use crate::{
	_prelude::*,
	auth::UserOrApp,
	decode::{Cursor, TemplateUrl, collection, date},
	request::{Method, Paginated, Request, RequestDescriptor},
};

/// Stream type filter for [`GetStreams`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StreamType {
	/// Every stream.
	#[default]
	All,
	/// Live streams only.
	Live,
}
impl Display for StreamType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::All => f.write_str("all"),
			Self::Live => f.write_str("live"),
		}
	}
}

/// `GET /helix/streams`, paginated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetStreams {
	/// Filter by broadcaster id.
	pub user_ids: Vec<String>,
	/// Filter by broadcaster login.
	pub user_logins: Vec<String>,
	/// Filter by category id.
	pub game_ids: Vec<String>,
	/// Filter by stream type.
	pub stream_type: Option<StreamType>,
	/// Filter by broadcast language.
	pub languages: Vec<String>,
	/// Page size (up to 100).
	pub first: Option<u32>,
	/// Cursor of the page to fetch.
	pub after: Option<Cursor>,
}
impl Request for GetStreams {
	type Auth = UserOrApp;
	type Response = Vec<Stream>;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "streams")
			.with_query_list("user_id", &self.user_ids)
			.with_query_list("user_login", &self.user_logins)
			.with_query_list("game_id", &self.game_ids)
			.with_query("type", self.stream_type)
			.with_query_list("language", &self.languages)
			.with_query("first", self.first)
			.with_query("after", self.after.as_ref().map(Cursor::as_str)))
	}
}
impl Paginated for GetStreams {
	fn set_after(&mut self, cursor: Cursor) {
		self.after = Some(cursor);
	}
}

/// A live stream.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Stream {
	/// Stream id.
	pub id: String,
	/// Broadcaster id.
	pub user_id: String,
	/// Broadcaster login.
	pub user_login: String,
	/// Broadcaster display name.
	pub user_name: String,
	/// Category id; empty when unset.
	#[serde(default)]
	pub game_id: String,
	/// Category name; empty when unset.
	#[serde(default)]
	pub game_name: String,
	/// `live`, or empty after an error.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// Stream title.
	#[serde(default)]
	pub title: String,
	/// Current viewers.
	#[serde(default)]
	pub viewer_count: u64,
	/// Broadcast start.
	#[serde(deserialize_with = "date::required")]
	pub started_at: OffsetDateTime,
	/// Broadcast language.
	#[serde(default)]
	pub language: String,
	/// Thumbnail template with `{width}`/`{height}` placeholders.
	pub thumbnail_url: TemplateUrl,
	/// Stream tags.
	#[serde(default, deserialize_with = "collection::null_as_empty")]
	pub tags: Vec<String>,
	/// Mature content flag.
	#[serde(default)]
	pub is_mature: bool,
}
