// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters shared by every clone of a session.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	requests: AtomicU64,
	refreshes: AtomicU64,
	coalesced: AtomicU64,
	refresh_failures: AtomicU64,
}
impl SessionMetrics {
	/// Returns the number of dispatched calls (a retried call counts once).
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of provider calls.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of callers that joined a refresh someone else performed.
	pub fn coalesced(&self) -> u64 {
		self.coalesced.load(Ordering::Relaxed)
	}

	/// Returns the number of failed provider calls.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_coalesced(&self) {
		self.coalesced.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}
}
