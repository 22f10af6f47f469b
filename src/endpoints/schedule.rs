//! Stream schedule endpoint.

// self
use crate::{
	_prelude::*,
	auth::UserOrApp,
	decode::{Cursor, DateInterval, collection, date},
	request::{IdentityField, Method, Paginated, Request, RequestDescriptor},
};

/// `GET /helix/schedule`, paginated.
///
/// Without a broadcaster id the token owner's schedule is requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetChannelStreamSchedule {
	/// Channel whose schedule to read.
	pub broadcaster_id: Option<String>,
	/// Specific segment ids.
	pub ids: Vec<String>,
	/// Only segments starting at or after this instant.
	pub start_time: Option<OffsetDateTime>,
	/// Page size (up to 25).
	pub first: Option<u32>,
	/// Cursor of the page to fetch.
	pub after: Option<Cursor>,
}
impl Request for GetChannelStreamSchedule {
	type Auth = UserOrApp;
	type Response = Schedule;

	fn descriptor(&self) -> Result<RequestDescriptor> {
		let start_time = self.start_time.and_then(date::format_timestamp);

		Ok(RequestDescriptor::for_policy::<Self::Auth>(Method::GET, "schedule")
			.with_query("broadcaster_id", self.broadcaster_id.as_deref())
			.with_query_list("id", &self.ids)
			.with_query("start_time", start_time)
			.with_query("first", self.first)
			.with_query("after", self.after.as_ref().map(Cursor::as_str))
			.with_identity(IdentityField::query("broadcaster_id")))
	}
}
impl Paginated for GetChannelStreamSchedule {
	fn set_after(&mut self, cursor: Cursor) {
		self.after = Some(cursor);
	}
}

/// A channel's schedule page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Schedule {
	/// Scheduled broadcasts; Helix sends `null` when there are none.
	#[serde(default, deserialize_with = "collection::null_as_empty")]
	pub segments: Vec<Segment>,
	/// Channel owner id.
	pub broadcaster_id: String,
	/// Channel owner display name.
	pub broadcaster_name: String,
	/// Channel owner login.
	pub broadcaster_login: String,
	/// Vacation window, if one is set.
	#[serde(default)]
	pub vacation: Option<DateInterval>,
}

/// One scheduled broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Segment {
	/// Segment id.
	pub id: String,
	/// Scheduled start.
	#[serde(deserialize_with = "date::required")]
	pub start_time: OffsetDateTime,
	/// Scheduled end.
	#[serde(default, deserialize_with = "date::optional")]
	pub end_time: Option<OffsetDateTime>,
	/// Broadcast title.
	#[serde(default)]
	pub title: String,
	/// Set when the segment was canceled up to this instant.
	#[serde(default, deserialize_with = "date::optional")]
	pub canceled_until: Option<OffsetDateTime>,
	/// Planned category.
	#[serde(default)]
	pub category: Option<Category>,
	/// Part of a recurring schedule.
	#[serde(default)]
	pub is_recurring: bool,
}

/// Category reference.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Category {
	/// Category id.
	pub id: String,
	/// Category name.
	pub name: String,
}
