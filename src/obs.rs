//! Optional observability helpers for session dispatch and credential refresh.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every dispatch inside a `helix_session.request` span (`method`,
//!   `host`, `path`) and every provider call inside a `helix_session.refresh` span (`kind`).
//! - Enable `metrics` to increment `helix_session_request_total` and
//!   `helix_session_refresh_total`, both labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for dispatched requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to the dispatcher.
	Attempt,
	/// Decoded 2xx response.
	Success,
	/// Policy mismatch; nothing was sent.
	Incompatible,
	/// No response was obtained.
	Transport,
	/// Credential rejected or refresh failed.
	Authorization,
	/// Non-2xx API response.
	Api,
	/// 2xx body did not match the declared shape.
	Decode,
	/// Local configuration or request building failure.
	Config,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Incompatible => "incompatible",
			RequestOutcome::Transport => "transport",
			RequestOutcome::Authorization => "authorization",
			RequestOutcome::Api => "api",
			RequestOutcome::Decode => "decode",
			RequestOutcome::Config => "config",
		}
	}

	/// Classifies a dispatch result.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(Error::IncompatibleCredential { .. }) => Self::Incompatible,
			Err(Error::Transport(_)) => Self::Transport,
			Err(
				Error::Authorization(_)
				| Error::InvalidGrant { .. }
				| Error::InvalidClient { .. }
				| Error::Transient(_),
			) => Self::Authorization,
			Err(Error::Api(_)) => Self::Api,
			Err(Error::Decode(_)) => Self::Decode,
			Err(Error::Config(_)) => Self::Config,
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for credential refreshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// A caller asked for a refresh.
	Attempt,
	/// The provider minted a new credential.
	Success,
	/// The provider failed.
	Failure,
	/// The caller joined a refresh another caller already completed.
	Coalesced,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
			RefreshOutcome::Coalesced => "coalesced",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{AuthorizationError, TransportError};

	#[test]
	fn outcomes_follow_the_error_taxonomy() {
		let transport: Result<()> =
			Err(TransportError::Io(std::io::Error::other("reset")).into());
		let rejected: Result<()> = Err(AuthorizationError::Rejected { status: 401 }.into());

		assert_eq!(RequestOutcome::of(&Ok::<_, Error>(())), RequestOutcome::Success);
		assert_eq!(RequestOutcome::of(&transport), RequestOutcome::Transport);
		assert_eq!(RequestOutcome::of(&rejected), RequestOutcome::Authorization);
		assert_eq!(RequestOutcome::Incompatible.to_string(), "incompatible");
	}
}
