//! Request descriptors and the typed [`Request`] contract.
//!
//! A [`RequestDescriptor`] is everything the dispatcher needs to put a call on the wire: method,
//! host, version prefix, path, ordered query, JSON body, the response shape to decode, the
//! credential kinds it accepts, and where the caller's identity may be injected. Typed endpoint
//! structs implement [`Request`] and produce a descriptor; untyped callers can build one directly
//! and run it through [`Session::execute`](crate::session::Session::execute).

pub mod query;
pub(crate) mod wire;

pub use query::*;

pub use oauth2::http::Method;

// std
use std::borrow::Cow;
// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{AuthPolicy, CredentialCompatibility},
	decode::Cursor,
	error::ConfigError,
};

/// API host a request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiHost {
	/// `api.twitch.tv`.
	Helix,
	/// Legacy ingest host.
	Legacy,
	/// `id.twitch.tv` (token validation and exchange).
	Identity,
}
impl ApiHost {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiHost::Helix => "helix",
			ApiHost::Legacy => "legacy",
			ApiHost::Identity => "identity",
		}
	}
}
impl Display for ApiHost {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Path prefix selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
	/// Prefix the path with `helix/`.
	#[default]
	Helix,
	/// Use the path as given.
	Unversioned,
}
impl ApiVersion {
	/// Path segment prepended to the request path, if any.
	pub const fn prefix(self) -> Option<&'static str> {
		match self {
			ApiVersion::Helix => Some("helix"),
			ApiVersion::Unversioned => None,
		}
	}
}

/// Where the caller's user id may be filled in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentityField {
	/// A query parameter with the given key.
	Query(Cow<'static, str>),
	/// A top-level field of the JSON body.
	Body(Cow<'static, str>),
}
impl IdentityField {
	/// Query-level identity slot.
	pub fn query(key: impl Into<Cow<'static, str>>) -> Self {
		Self::Query(key.into())
	}

	/// Body-level identity slot.
	pub fn body(key: impl Into<Cow<'static, str>>) -> Self {
		Self::Body(key.into())
	}

	/// Name of the field.
	pub fn key(&self) -> &str {
		match self {
			IdentityField::Query(key) | IdentityField::Body(key) => key,
		}
	}
}

/// How a 2xx response body maps onto the request's response type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseShape {
	/// `{ "data": [..], "pagination": {..}, "total": .. }`; the response type decodes from the
	/// `data` array (an absent or `null` array counts as empty).
	#[default]
	Data,
	/// Like [`ResponseShape::Data`] but `data` must hold exactly one element, which becomes the
	/// response value.
	SingleData,
	/// The whole body decodes into the response type.
	Body,
	/// The body is ignored (typically `204 No Content`).
	Empty,
}

/// Complete description of one API call.
///
/// Built once per call and consumed by the dispatcher; the only mutation it sees afterwards is
/// identity injection on a per-attempt copy.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
	method: Method,
	host: ApiHost,
	version: ApiVersion,
	path: Cow<'static, str>,
	query: QueryParams,
	body: Option<Value>,
	shape: ResponseShape,
	compatibility: CredentialCompatibility,
	identity: Option<IdentityField>,
}
impl RequestDescriptor {
	/// Creates a Helix descriptor with an empty query and no body.
	pub fn new(
		method: Method,
		path: impl Into<Cow<'static, str>>,
		compatibility: CredentialCompatibility,
	) -> Self {
		Self {
			method,
			host: ApiHost::Helix,
			version: ApiVersion::Helix,
			path: path.into(),
			query: QueryParams::new(),
			body: None,
			shape: ResponseShape::Data,
			compatibility,
			identity: None,
		}
	}

	/// Creates a descriptor whose compatibility comes from the policy marker `P`.
	pub fn for_policy<P>(method: Method, path: impl Into<Cow<'static, str>>) -> Self
	where
		P: AuthPolicy,
	{
		Self::new(method, path, P::COMPATIBILITY)
	}

	/// Targets another host.
	pub fn with_host(mut self, host: ApiHost) -> Self {
		self.host = host;

		self
	}

	/// Overrides the version prefix.
	pub fn with_version(mut self, version: ApiVersion) -> Self {
		self.version = version;

		self
	}

	/// Appends a query parameter; `None` values are skipped on the wire.
	pub fn with_query(mut self, key: impl Into<String>, value: Option<impl Display>) -> Self {
		self.query.push(key, value);

		self
	}

	/// Appends one query parameter per value.
	pub fn with_query_list<I, V>(mut self, key: &str, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Display,
	{
		self.query.extend(key, values);

		self
	}

	/// Serializes `body` as the JSON request body.
	pub fn with_json_body<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(ConfigError::BodyEncode)?);

		Ok(self)
	}

	/// Declares the response shape.
	pub fn with_shape(mut self, shape: ResponseShape) -> Self {
		self.shape = shape;

		self
	}

	/// Declares where the session may inject the caller's user id.
	pub fn with_identity(mut self, field: IdentityField) -> Self {
		self.identity = Some(field);

		self
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Target host.
	pub fn host(&self) -> ApiHost {
		self.host
	}

	/// Version prefix.
	pub fn version(&self) -> ApiVersion {
		self.version
	}

	/// Path relative to the host and version prefix.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query parameters in insertion order.
	pub fn query(&self) -> &QueryParams {
		&self.query
	}

	/// JSON body, if any.
	pub fn body(&self) -> Option<&Value> {
		self.body.as_ref()
	}

	/// Declared response shape.
	pub fn shape(&self) -> ResponseShape {
		self.shape
	}

	/// Declared credential compatibility.
	pub fn compatibility(&self) -> CredentialCompatibility {
		self.compatibility
	}

	/// Identity injection slot, if any.
	pub fn identity(&self) -> Option<&IdentityField> {
		self.identity.as_ref()
	}

	/// Sets the `after` cursor used to fetch the next page.
	pub fn set_after(&mut self, cursor: &Cursor) {
		self.query.set("after", cursor.as_str());
	}

	/// Writes `value` into `field` unless the caller already set it.
	///
	/// A field counts as unset when it is absent, `null`, or an empty string. Returns `true` when
	/// the value was written. A non-object body cannot carry a field and is left untouched.
	pub fn fill_identity(&mut self, field: &IdentityField, value: &str) -> bool {
		match field {
			IdentityField::Query(key) => self.query.fill(key, value),
			IdentityField::Body(key) => {
				let body = self.body.get_or_insert_with(|| Value::Object(Map::new()));
				let Value::Object(map) = body else {
					return false;
				};

				match map.get(key.as_ref()) {
					None | Some(Value::Null) => {},
					Some(Value::String(current)) if current.is_empty() => {},
					Some(_) => return false,
				}

				map.insert(key.to_string(), Value::String(value.to_owned()));

				true
			},
		}
	}
}

/// A typed API call.
///
/// `Auth` fixes which credential kinds may execute the call; sessions only accept requests whose
/// policy [`Permits`](crate::auth::Permits) their own kind.
pub trait Request {
	/// Credential policy marker.
	type Auth: AuthPolicy;
	/// Value decoded from a successful response according to the descriptor's shape.
	type Response: DeserializeOwned;

	/// Builds the descriptor for this call.
	fn descriptor(&self) -> Result<RequestDescriptor>;
}

/// A request whose results are split across pages linked by a cursor.
pub trait Paginated
where
	Self: Request,
{
	/// Points the request at the page after `cursor`.
	fn set_after(&mut self, cursor: Cursor);
}
