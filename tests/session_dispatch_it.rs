#![cfg(feature = "reqwest")]

// std
use std::{
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration as StdDuration,
};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use helix_session::{
	_preludet::*,
	auth::{
		AppToken, ClientId, Credential, Expiry, NoCredential, ScopeSet, UserId, UserOnly,
		UserToken, Validation,
	},
	endpoints::{GetStreams, GetUsers, StartCommercial, User},
	error::AuthorizationError,
	provider::{CredentialProvider, ProviderFuture},
	request::{Method, RequestDescriptor},
};

const CLIENT_ID: &str = "client-dispatch";

struct CountingProvider {
	calls: AtomicUsize,
	next: &'static str,
	delay: StdDuration,
}
impl CountingProvider {
	fn new(next: &'static str) -> Arc<Self> {
		Arc::new(Self { calls: AtomicUsize::new(0), next, delay: StdDuration::from_millis(50) })
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl CredentialProvider for CountingProvider {
	fn refresh<'a>(&'a self, current: &'a Credential) -> ProviderFuture<'a> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(self.delay).await;

			Ok(Credential::new(current.kind(), self.next))
		})
	}
}

fn validation(expires: Expiry) -> Validation {
	Validation::new(
		UserId::new("123").expect("User fixture should be valid."),
		ClientId::new(CLIENT_ID).expect("Client fixture should be valid."),
		ScopeSet::new(["channel:edit:commercial"]).expect("Scope fixture should be valid."),
		expires,
	)
}

fn user_session(server: &MockServer, credential: Credential) -> ReqwestTestSession<UserToken> {
	build_reqwest_test_session(&server.base_url(), CLIENT_ID, credential)
		.expect("User test session should build.")
}

#[tokio::test]
async fn incompatible_requests_never_reach_the_transport() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let app: ReqwestTestSession<AppToken> =
		build_reqwest_test_session(&server.base_url(), CLIENT_ID, Credential::app("app-token"))
			.expect("App test session should build.");
	let user = user_session(&server, Credential::user("user-token"));
	let app_err = app
		.execute::<Vec<User>>(RequestDescriptor::for_policy::<UserOnly>(Method::GET, "users"))
		.await
		.expect_err("User-only descriptors must be rejected on an app session.");
	let none_err = user
		.execute::<Vec<User>>(RequestDescriptor::for_policy::<NoCredential>(Method::GET, "users"))
		.await
		.expect_err("Credential-less descriptors must be rejected.");

	assert!(matches!(app_err, Error::IncompatibleCredential { .. }));
	assert!(matches!(none_err, Error::IncompatibleCredential { .. }));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn commercial_body_carries_the_token_owner() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/helix/channels/commercial")
				.header("authorization", "Bearer user-token")
				.header("client-id", CLIENT_ID)
				.json_body(json!({ "broadcaster_id": "123", "length": 30 }));
			then.status(200).json_body(json!({
				"data": [{ "length": 30, "message": "", "retry_after": 480 }]
			}));
		})
		.await;
	let session = user_session(
		&server,
		Credential::user("user-token").with_validation(validation(Expiry::Never)),
	);
	let response =
		session.send(&StartCommercial::new(30)).await.expect("Commercial should start.");

	mock.assert_async().await;

	assert_eq!(response.data.length, 30);
	assert_eq!(response.data.retry_after, 480);
	assert_eq!(response.status, 200);
}

#[tokio::test]
async fn concurrent_rejections_share_one_refresh() {
	let server = MockServer::start_async().await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer stale");
			then.status(401).json_body(json!({
				"error": "Unauthorized",
				"status": 401,
				"message": "Invalid OAuth token"
			}));
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer fresh");
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let provider = CountingProvider::new("fresh");
	let session = user_session(&server, Credential::user("stale").with_refresh_token("refresh"))
		.with_provider(provider.clone());
	let tasks = (0..8)
		.map(|_| {
			let session = session.clone();

			tokio::spawn(async move { session.send(&GetUsers::default()).await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await
			.expect("Request task should not panic.")
			.expect("Every concurrent request should succeed after the refresh.");
	}

	assert_eq!(provider.calls(), 1);
	assert_eq!(session.credential().access_token().expose(), "fresh");
	assert_eq!(session.metrics().refreshes(), 1);
	assert!(rejected.calls_async().await >= 1);

	accepted.assert_calls_async(8).await;
}

#[tokio::test]
async fn expired_credentials_refresh_before_sending() {
	let server = MockServer::start_async().await;
	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer expired");
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer renewed");
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let provider = CountingProvider::new("renewed");
	let expired = Credential::user("expired")
		.with_refresh_token("refresh")
		.with_validation(validation(Expiry::At(OffsetDateTime::now_utc() - Duration::minutes(1))));
	let session = user_session(&server, expired).with_provider(provider.clone());
	let (left, right) = (GetUsers::default(), GetUsers::default());
	let (first, second) = tokio::join!(session.send(&left), session.send(&right));

	first.expect("First request should succeed.");
	second.expect("Second request should succeed.");

	assert_eq!(provider.calls(), 1);

	stale.assert_calls_async(0).await;
	fresh.assert_calls_async(2).await;
}

#[tokio::test]
async fn repeated_rejection_is_reported_after_one_retry() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users");
			then.status(401).json_body(json!({ "status": 401, "message": "Invalid OAuth token" }));
		})
		.await;
	let provider = CountingProvider::new("still-rejected");
	let session = user_session(&server, Credential::user("stale").with_refresh_token("refresh"))
		.with_provider(provider.clone());
	let err = session
		.send(&GetUsers::default())
		.await
		.expect_err("A second rejection should not be retried.");

	assert!(matches!(err, Error::Authorization(AuthorizationError::Rejected { status: 401 })));
	assert_eq!(provider.calls(), 1);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejection_without_provider_is_not_retried() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users");
			then.status(401).body("");
		})
		.await;
	let session = user_session(&server, Credential::user("stale"));
	let err = session
		.send(&GetUsers::default())
		.await
		.expect_err("Rejection without a provider should fail.");

	assert!(matches!(
		err,
		Error::Authorization(AuthorizationError::RefreshUnavailable { status: 401 })
	));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users");
			then.status(503).header("retry-after", "5").json_body(json!({
				"error": "Service Unavailable",
				"status": 503,
				"message": "Try again later"
			}));
		})
		.await;
	let provider = CountingProvider::new("unused");
	let session =
		user_session(&server, Credential::user("token")).with_provider(provider.clone());
	let err = session.send(&GetUsers::default()).await.expect_err("503 should be an error.");
	let Error::Api(api) = err else { panic!("Expected an API error, got {err:?}.") };

	assert_eq!(api.status, 503);
	assert_eq!(api.message, "Try again later");
	assert_eq!(api.retry_after, Some(Duration::seconds(5)));
	assert_eq!(provider.calls(), 0);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn mismatched_success_bodies_report_the_failing_path() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users");
			then.status(200).json_body(json!({ "data": [{ "id": 1 }] }));
		})
		.await;

	let session = user_session(&server, Credential::user("token"));
	let err = session
		.send(&GetUsers::default())
		.await
		.expect_err("Numeric ids should fail to decode.");
	let Error::Decode(decode) = err else { panic!("Expected a decode error, got {err:?}.") };

	assert_eq!(decode.status, 200);
	assert_eq!(decode.source.path().to_string(), "[0].id");
}

#[tokio::test]
async fn unreachable_hosts_surface_as_transport_errors() {
	let session: ReqwestTestSession<UserToken> =
		build_reqwest_test_session("http://127.0.0.1:9", CLIENT_ID, Credential::user("token"))
			.expect("Test session should build.");
	let err = session
		.send(&GetUsers::default())
		.await
		.expect_err("Connection failures should surface.");

	assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn pager_follows_cursors_until_exhausted() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/streams").query_param_missing("after");
			then.status(200).json_body(json!({
				"data": [stream("1")],
				"pagination": { "cursor": "page-2" }
			}));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/streams").query_param("after", "page-2");
			then.status(200).json_body(json!({ "data": [stream("2")], "pagination": {} }));
		})
		.await;
	let session = user_session(&server, Credential::user("token"));
	let mut pager = session.pager(GetStreams { first: Some(1), ..Default::default() });
	let mut ids = Vec::new();

	while let Some(page) = pager.next_page().await.expect("Page should load.") {
		ids.extend(page.data.into_iter().map(|stream| stream.id));
	}

	assert_eq!(ids, ["1", "2"]);
	assert!(pager.is_exhausted());
	assert!(pager.next_page().await.expect("Exhausted pager should not fail.").is_none());

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

fn stream(id: &str) -> serde_json::Value {
	json!({
		"id": id,
		"user_id": "141981764",
		"user_login": "twitchdev",
		"user_name": "TwitchDev",
		"game_id": "",
		"game_name": "",
		"type": "live",
		"title": "",
		"viewer_count": 0,
		"started_at": "2021-03-10T15:04:21Z",
		"language": "en",
		"thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_twitchdev-{width}x{height}.jpg",
		"tags": [],
		"is_mature": false
	})
}
