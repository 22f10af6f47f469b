//! Forward-only pagination.

// self
use crate::{
	_prelude::*,
	auth::{AuthKind, Permits},
	decode::Cursor,
	http::HelixHttpClient,
	oauth::TransportErrorMapper,
	request::{Paginated, Request},
	session::{HelixResponse, Session},
};

#[derive(Clone, Debug)]
enum PagerState {
	First,
	After(Cursor),
	Exhausted,
}

/// Walks a paginated request one page at a time.
///
/// Pages are fetched lazily and only forward. The server may change the underlying data between
/// fetches, so the sequence is not a snapshot. A failed fetch leaves the pager where it was, so
/// calling [`Pager::next_page`] again retries the same page.
pub struct Pager<'s, K, C, M, R>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	R: Paginated,
{
	session: &'s Session<K, C, M>,
	request: R,
	state: PagerState,
}
impl<'s, K, C, M, R> Pager<'s, K, C, M, R>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	R: Paginated,
	R::Auth: Permits<K>,
{
	pub(super) fn new(session: &'s Session<K, C, M>, request: R) -> Self {
		Self { session, request, state: PagerState::First }
	}

	/// Fetches the next page; `Ok(None)` once the last page was returned.
	pub async fn next_page(&mut self) -> Result<Option<HelixResponse<<R as Request>::Response>>> {
		match &self.state {
			PagerState::Exhausted => return Ok(None),
			PagerState::After(cursor) => self.request.set_after(cursor.clone()),
			PagerState::First => {},
		}

		let page = self.session.send(&self.request).await?;

		self.state = match &page.cursor {
			Some(cursor) => PagerState::After(cursor.clone()),
			None => PagerState::Exhausted,
		};

		Ok(Some(page))
	}

	/// Returns true once the last page was fetched.
	pub fn is_exhausted(&self) -> bool {
		matches!(self.state, PagerState::Exhausted)
	}

	/// Request as it will be sent for the next page.
	pub fn request(&self) -> &R {
		&self.request
	}
}
