//! Session handle: one credential, one transport, typed dispatch.
//!
//! A [`Session`] binds a credential of kind `K` (see [`AuthKind`]) to an HTTP transport and an
//! optional [`CredentialProvider`]. Requests run through the dispatcher which resolves policy,
//! injects identity, sends, refreshes at most once on rejection, and decodes the body. Clones
//! share the credential, the refresh gate, and the metrics; separate sessions never coalesce
//! with each other.

mod dispatch;
mod metrics;
mod pager;
mod slot;
mod validate;

pub use metrics::*;
pub use pager::*;

// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	auth::{AuthKind, Credential, Permits},
	config::ApiEndpoints,
	decode::Cursor,
	error::ConfigError,
	http::HelixHttpClient,
	oauth::TransportErrorMapper,
	provider::CredentialProvider,
	request::{Paginated, Request, RequestDescriptor},
	session::slot::CredentialSlot,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Decoded success envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelixResponse<T> {
	/// Value decoded according to the request's response shape.
	pub data: T,
	/// Cursor for the next page; `None` on the last page.
	pub cursor: Option<Cursor>,
	/// `total` member, when the endpoint reports one.
	pub total: Option<u64>,
	/// HTTP status of the response.
	pub status: u16,
}
impl<T> HelixResponse<T> {
	/// Returns true if another page exists.
	pub fn has_next_page(&self) -> bool {
		self.cursor.is_some()
	}

	/// Maps the decoded value, keeping the envelope.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> HelixResponse<U> {
		let Self { data, cursor, total, status } = self;

		HelixResponse { data: f(data), cursor, total, status }
	}
}

/// Credential-bound request executor.
///
/// `K` fixes the credential kind at the type level so [`Session::send`] only accepts requests
/// whose policy permits it; the same check also runs at dispatch time.
pub struct Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	endpoints: Arc<ApiEndpoints>,
	client_id: Arc<str>,
	provider: Option<Arc<dyn CredentialProvider>>,
	slot: Arc<CredentialSlot>,
	metrics: Arc<SessionMetrics>,
	_kind: PhantomData<fn() -> K>,
}
#[cfg(feature = "reqwest")]
impl<K> Session<K, ReqwestHttpClient, ReqwestTransportErrorMapper>
where
	K: AuthKind,
{
	/// Creates a reqwest-backed session against Twitch's production hosts.
	pub fn new(client_id: impl Into<String>, credential: Credential) -> Result<Self> {
		Self::with_http_client(
			client_id,
			credential,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<K, C, M> Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a session on a custom transport.
	///
	/// Fails when the credential's kind does not match `K`.
	pub fn with_http_client(
		client_id: impl Into<String>,
		credential: Credential,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		ensure_kind::<K>(&credential)?;

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: transport_mapper.into(),
			endpoints: Arc::new(ApiEndpoints::builder().build()?),
			client_id: Arc::from(client_id.into()),
			provider: None,
			slot: Arc::new(CredentialSlot::new(credential)),
			metrics: Arc::new(SessionMetrics::default()),
			_kind: PhantomData,
		})
	}

	/// Overrides the API base URLs.
	pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
		self.endpoints = Arc::new(endpoints);

		self
	}

	/// Installs the provider used to replace rejected or expired credentials.
	pub fn with_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
		self.provider = Some(provider);

		self
	}

	/// API base URLs.
	pub fn endpoints(&self) -> &ApiEndpoints {
		&self.endpoints
	}

	/// Client identifier sent in the `Client-Id` header.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Shared counters.
	pub fn metrics(&self) -> &SessionMetrics {
		&self.metrics
	}

	/// Current credential.
	pub fn credential(&self) -> Arc<Credential> {
		self.slot.lease().credential
	}

	/// Swaps the credential wholesale.
	///
	/// In-flight requests finish with the credential they started with; a rejection they see
	/// afterwards joins the new credential instead of refreshing.
	pub fn replace_credential(&self, credential: Credential) -> Result<()> {
		ensure_kind::<K>(&credential)?;
		self.slot.replace(credential);

		Ok(())
	}

	/// Dispatches a typed request.
	pub async fn send<R>(&self, request: &R) -> Result<HelixResponse<R::Response>>
	where
		R: Request,
		R::Auth: Permits<K>,
	{
		let descriptor = request.descriptor()?;

		self.dispatch(descriptor).await.map(|(response, _)| response)
	}

	/// Dispatches an untyped descriptor.
	///
	/// Compatibility is only checked at runtime here.
	pub async fn execute<T>(&self, descriptor: RequestDescriptor) -> Result<HelixResponse<T>>
	where
		T: DeserializeOwned,
	{
		self.dispatch(descriptor).await.map(|(response, _)| response)
	}

	/// Walks a paginated request page by page.
	pub fn pager<R>(&self, request: R) -> Pager<'_, K, C, M, R>
	where
		R: Paginated,
		R::Auth: Permits<K>,
	{
		Pager::new(self, request)
	}
}
impl<K, C, M> Clone for Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
			endpoints: Arc::clone(&self.endpoints),
			client_id: Arc::clone(&self.client_id),
			provider: self.provider.clone(),
			slot: Arc::clone(&self.slot),
			metrics: Arc::clone(&self.metrics),
			_kind: PhantomData,
		}
	}
}
impl<K, C, M> Debug for Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("kind", &K::KIND)
			.field("client_id", &self.client_id)
			.field("endpoints", &self.endpoints)
			.field("credential", &self.credential())
			.field("has_provider", &self.provider.is_some())
			.finish_non_exhaustive()
	}
}

fn ensure_kind<K>(credential: &Credential) -> Result<(), ConfigError>
where
	K: AuthKind,
{
	if credential.kind() == K::KIND {
		Ok(())
	} else {
		Err(ConfigError::CredentialKindMismatch { expected: K::KIND, actual: credential.kind() })
	}
}
