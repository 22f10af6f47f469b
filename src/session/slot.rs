//! Per-session credential cell with a single-flight refresh gate.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::{AuthorizationError, ConfigError},
	obs::{self, RefreshOutcome, SessionSpan},
	provider::CredentialProvider,
	session::SessionMetrics,
};

/// Credential snapshot tagged with the generation it was read at.
#[derive(Clone, Debug)]
pub(crate) struct CredentialLease {
	pub(crate) generation: u64,
	pub(crate) credential: Arc<Credential>,
}

/// Latest credential plus the gate that serializes refreshes.
///
/// Every replacement bumps the generation. A caller that saw generation `n` rejected asks for a
/// refresh "after `n`": if the generation moved while it waited for the gate, someone already
/// refreshed and the caller just takes the newer credential.
#[derive(Debug)]
pub(crate) struct CredentialSlot {
	current: RwLock<CredentialLease>,
	gate: AsyncMutex<()>,
	failures: AtomicU64,
}
impl CredentialSlot {
	pub(crate) fn new(credential: Credential) -> Self {
		Self {
			current: RwLock::new(CredentialLease { generation: 0, credential: Arc::new(credential) }),
			gate: AsyncMutex::new(()),
			failures: AtomicU64::new(0),
		}
	}

	pub(crate) fn lease(&self) -> CredentialLease {
		self.current.read().clone()
	}

	pub(crate) fn replace(&self, credential: Credential) -> CredentialLease {
		let mut current = self.current.write();

		current.generation += 1;
		current.credential = Arc::new(credential);

		current.clone()
	}

	/// Replaces the credential only if nobody replaced it since `generation`.
	pub(crate) fn replace_if(
		&self,
		generation: u64,
		credential: Credential,
	) -> Option<CredentialLease> {
		let mut current = self.current.write();

		if current.generation != generation {
			return None;
		}

		current.generation += 1;
		current.credential = Arc::new(credential);

		Some(current.clone())
	}

	/// Returns a credential newer than `observed`, refreshing through `provider` if nobody else
	/// did.
	///
	/// At most one provider call runs per slot at a time. Callers that queued behind a refresh
	/// that failed get [`AuthorizationError::RefreshAbandoned`] instead of starting another one.
	pub(crate) async fn refresh_after(
		&self,
		observed: &CredentialLease,
		provider: &dyn CredentialProvider,
		metrics: &SessionMetrics,
	) -> Result<CredentialLease> {
		obs::record_refresh_outcome(RefreshOutcome::Attempt);

		let failures_seen = self.failures.load(Ordering::Acquire);
		let _gate = self.gate.lock().await;
		let current = self.lease();

		if current.generation != observed.generation {
			metrics.record_coalesced();
			obs::record_refresh_outcome(RefreshOutcome::Coalesced);

			#[cfg(feature = "tracing")]
			tracing::debug!(
				generation = current.generation,
				"Joined a completed credential refresh."
			);

			return Ok(current);
		}
		if self.failures.load(Ordering::Acquire) != failures_seen {
			metrics.record_coalesced();
			obs::record_refresh_outcome(RefreshOutcome::Coalesced);

			return Err(AuthorizationError::RefreshAbandoned.into());
		}

		metrics.record_refresh();

		let kind = current.credential.kind();
		let result = SessionSpan::refresh(kind)
			.instrument(current.credential.refresh(provider))
			.await
			.and_then(|next| {
				if next.kind() == kind {
					Ok(next)
				} else {
					Err(ConfigError::CredentialKindMismatch { expected: kind, actual: next.kind() }
						.into())
				}
			});

		match result {
			Ok(next) => {
				obs::record_refresh_outcome(RefreshOutcome::Success);

				Ok(self.replace(next))
			},
			Err(e) => {
				self.failures.fetch_add(1, Ordering::AcqRel);
				metrics.record_refresh_failure();
				obs::record_refresh_outcome(RefreshOutcome::Failure);

				Err(AuthorizationError::refresh_failed(e).into())
			},
		}
	}
}
