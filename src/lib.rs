//! Typed Twitch Helix request execution: credential policy checks, identity injection, coalesced
//! token refresh, and lenient response decoding behind one session handle.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod request;
pub mod session;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AuthKind, Credential},
		config::ApiEndpoints,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		session::Session,
	};

	/// Session type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSession<K> = Session<K, ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest session pointed at a mock server for every API host.
	pub fn build_reqwest_test_session<K>(
		base_url: &str,
		client_id: &str,
		credential: Credential,
	) -> Result<ReqwestTestSession<K>>
	where
		K: AuthKind,
	{
		let base = Url::parse(base_url).map_err(crate::error::ConfigError::from)?;
		let endpoints = ApiEndpoints::builder()
			.helix(base.clone())
			.legacy(base.clone())
			.identity(base)
			.build()?;

		Ok(Session::new(client_id, credential)?.with_endpoints(endpoints))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
