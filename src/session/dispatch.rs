//! The dispatch loop: policy, identity, transmit, one coalesced refresh, decode.

// crates.io
use oauth2::{AsyncHttpClient, http::StatusCode};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{self, AuthKind},
	decode::{Cursor, singleton},
	error::{ApiError, AuthorizationError, DecodeError},
	http::{HelixHttpClient, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	obs::{self, RequestOutcome, SessionSpan},
	request::{RequestDescriptor, ResponseShape, wire},
	session::{HelixResponse, Session, slot::CredentialLease},
};

impl<K, C, M> Session<K, C, M>
where
	K: AuthKind,
	C: ?Sized + HelixHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs one call and returns the lease whose credential produced the response.
	pub(super) async fn dispatch<T>(
		&self,
		descriptor: RequestDescriptor,
	) -> Result<(HelixResponse<T>, CredentialLease)>
	where
		T: DeserializeOwned,
	{
		let span = SessionSpan::request(&descriptor);

		self.metrics.record_request();
		obs::record_request_outcome(RequestOutcome::Attempt);

		let result = span.instrument(self.dispatch_inner(descriptor)).await;

		obs::record_request_outcome(RequestOutcome::of(&result));

		result
	}

	async fn dispatch_inner<T>(
		&self,
		descriptor: RequestDescriptor,
	) -> Result<(HelixResponse<T>, CredentialLease)>
	where
		T: DeserializeOwned,
	{
		let mut lease = self.slot.lease();

		auth::resolve(descriptor.compatibility(), lease.credential.kind())?;

		let mut refreshed = false;
		let expired = lease.credential.is_expired(OffsetDateTime::now_utc());

		if let Some(provider) = self.provider.as_ref().filter(|_| expired) {
			lease = self.slot.refresh_after(&lease, provider.as_ref(), &self.metrics).await?;
			refreshed = true;
		}

		loop {
			auth::resolve(descriptor.compatibility(), lease.credential.kind())?;

			let mut attempt = descriptor.clone();

			auth::inject_identity(&mut attempt, &lease.credential);

			let request =
				wire::build(&self.endpoints, &self.client_id, &attempt, &lease.credential)?;
			let meta = ResponseMetadataSlot::default();
			let handle = self.http_client.with_metadata(meta.clone());
			let response = handle.call(request).await.map_err(|e| {
				self.transport_mapper.map_transport_error(meta.take().as_ref(), e)
			})?;
			let status = response.status();
			let retry_after = meta.take().and_then(|captured| captured.retry_after);

			if status == StatusCode::UNAUTHORIZED {
				if refreshed {
					#[cfg(feature = "tracing")]
					tracing::warn!("Credential was rejected again after the coalesced refresh.");

					return Err(AuthorizationError::Rejected { status: status.as_u16() }.into());
				}

				let Some(provider) = &self.provider else {
					return Err(
						AuthorizationError::RefreshUnavailable { status: status.as_u16() }.into()
					);
				};

				lease = self.slot.refresh_after(&lease, provider.as_ref(), &self.metrics).await?;
				refreshed = true;

				continue;
			}
			if !status.is_success() {
				return Err(ApiError::from_body(status.as_u16(), response.body(), retry_after).into());
			}

			return decode_response(descriptor.shape(), status.as_u16(), response.body())
				.map(|decoded| (decoded, lease));
		}
	}
}

/// Decodes a 2xx body according to `shape`.
pub(crate) fn decode_response<T>(
	shape: ResponseShape,
	status: u16,
	body: &[u8],
) -> Result<HelixResponse<T>>
where
	T: DeserializeOwned,
{
	let decode_err = |source| DecodeError { source, status };

	if shape == ResponseShape::Empty {
		let data = serde_path_to_error::deserialize(Value::Null).map_err(decode_err)?;

		return Ok(HelixResponse { data, cursor: None, total: None, status });
	}

	let mut document = if body.iter().all(u8::is_ascii_whitespace) {
		Value::Null
	} else {
		serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(body))
			.map_err(decode_err)?
	};
	let cursor = Cursor::from_envelope(&document);
	let total = document.get("total").and_then(Value::as_u64);
	let data = match shape {
		ResponseShape::Data =>
			serde_path_to_error::deserialize(take_data(&mut document)).map_err(decode_err)?,
		ResponseShape::SingleData =>
			serde_path_to_error::deserialize::<_, Single<T>>(take_data(&mut document))
				.map_err(decode_err)?
				.0,
		ResponseShape::Body | ResponseShape::Empty =>
			serde_path_to_error::deserialize(document).map_err(decode_err)?,
	};

	Ok(HelixResponse { data, cursor, total, status })
}

/// Pulls `data` out of the envelope; a missing or `null` member counts as an empty list.
fn take_data(document: &mut Value) -> Value {
	match document {
		Value::Object(map) => match map.remove("data") {
			None | Some(Value::Null) => Value::Array(Vec::new()),
			Some(data) => data,
		},
		other => other.take(),
	}
}

struct Single<T>(T);
impl<'de, T> Deserialize<'de> for Single<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		singleton::deserialize(deserializer).map(Single)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize, PartialEq)]
	struct User {
		id: String,
	}

	#[test]
	fn data_shape_reads_cursor_and_total() {
		let page = decode_response::<Vec<User>>(
			ResponseShape::Data,
			200,
			br#"{"data":[{"id":"1"},{"id":"2"}],"pagination":{"cursor":"abc"},"total":40}"#,
		)
		.expect("Page should decode.");

		assert_eq!(page.data, vec![User { id: "1".into() }, User { id: "2".into() }]);
		assert_eq!(page.cursor.as_ref().map(Cursor::as_str), Some("abc"));
		assert_eq!(page.total, Some(40));
	}

	#[test]
	fn null_data_decodes_to_empty_list() {
		let page = decode_response::<Vec<User>>(
			ResponseShape::Data,
			200,
			br#"{"data":null,"pagination":{}}"#,
		)
		.expect("Null data should decode.");

		assert!(page.data.is_empty());
		assert!(!page.has_next_page());
	}

	#[test]
	fn single_data_rejects_ambiguous_lengths() {
		let single =
			decode_response::<User>(ResponseShape::SingleData, 200, br#"{"data":[{"id":"7"}]}"#)
				.expect("Singleton should decode.");

		assert_eq!(single.data, User { id: "7".into() });

		for body in [&br#"{"data":[]}"#[..], &br#"{"data":[{"id":"1"},{"id":"2"}]}"#[..]] {
			let err = decode_response::<User>(ResponseShape::SingleData, 200, body)
				.expect_err("Ambiguous singleton must fail.");

			assert!(matches!(err, Error::Decode(DecodeError { status: 200, .. })));
		}
	}

	#[test]
	fn decode_errors_carry_the_json_path() {
		let err = decode_response::<Vec<User>>(
			ResponseShape::Data,
			200,
			br#"{"data":[{"id":"1"},{"id":2}]}"#,
		)
		.expect_err("Wrong field type must fail.");
		let Error::Decode(decode) = err else {
			panic!("Expected a decode error, got {err:?}.");
		};

		assert_eq!(decode.source.path().to_string(), "[1].id");
	}

	#[test]
	fn empty_shape_ignores_the_body() {
		let response = decode_response::<()>(ResponseShape::Empty, 204, b"")
			.expect("Empty response should decode.");

		assert_eq!(response.status, 204);
		assert!(decode_response::<()>(ResponseShape::Empty, 200, b"not json").is_ok());
	}

	#[test]
	fn malformed_bodies_are_decode_errors() {
		assert!(matches!(
			decode_response::<Vec<User>>(ResponseShape::Data, 200, b"<html>"),
			Err(Error::Decode(_))
		));
	}
}
