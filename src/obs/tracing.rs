// self
use crate::{_prelude::*, auth::CredentialKind, request::RequestDescriptor};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type Instrumented<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type Instrumented<F> = F;

/// Span wrapper used by the dispatcher and the credential slot.
#[derive(Clone, Debug)]
pub struct SessionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl SessionSpan {
	/// Span covering one dispatched request, including its retry.
	pub fn request(descriptor: &RequestDescriptor) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"helix_session.request",
				method = %descriptor.method(),
				host = descriptor.host().as_str(),
				path = descriptor.path(),
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = descriptor;

			Self {}
		}
	}

	/// Span covering one provider call.
	pub fn refresh(kind: CredentialKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("helix_session.refresh", kind = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
