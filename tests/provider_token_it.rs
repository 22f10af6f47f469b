#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use helix_session::{
	_preludet::*,
	auth::{ClientId, Credential, CredentialKind, Expiry, ScopeSet, UserId, UserToken, Validation},
	config::ApiEndpoints,
	endpoints::GetUsers,
	provider::{ClientCredentialsProvider, CredentialProvider, RefreshTokenProvider},
};

const CLIENT_ID: &str = "client-provider";
const CLIENT_SECRET: &str = "secret-provider";

fn endpoints(server: &MockServer) -> ApiEndpoints {
	let base = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	ApiEndpoints::builder()
		.helix(base.clone())
		.legacy(base.clone())
		.identity(base)
		.build()
		.expect("Mock endpoints should build.")
}

fn owned_credential(access: &str) -> Credential {
	Credential::user(access).with_refresh_token("refresh-old").with_validation(Validation::new(
		UserId::new("141981764").expect("User fixture should be valid."),
		ClientId::new(CLIENT_ID).expect("Client fixture should be valid."),
		ScopeSet::new(["user:read:email"]).expect("Scope fixture should be valid."),
		Expiry::Never,
	))
}

#[tokio::test]
async fn refresh_grant_rotates_secrets_and_keeps_the_owner() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", "refresh-old")
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET);
			then.status(200).json_body(json!({
				"access_token": "access-new",
				"refresh_token": "refresh-new",
				"expires_in": 14400,
				"scope": ["channel:edit:commercial", "user:read:email"],
				"token_type": "bearer"
			}));
		})
		.await;
	let provider = RefreshTokenProvider::new(CLIENT_ID, CLIENT_SECRET)
		.expect("Refresh provider should build.")
		.with_endpoints(&endpoints(&server))
		.expect("Refresh provider should accept mock endpoints.");
	let before = OffsetDateTime::now_utc();
	let refreshed = provider
		.refresh(&owned_credential("access-old"))
		.await
		.expect("Refresh grant should succeed.");

	mock.assert_async().await;

	let validation = refreshed.validation().expect("Owner metadata should carry over.");

	assert_eq!(refreshed.kind(), CredentialKind::User);
	assert_eq!(refreshed.access_token().expose(), "access-new");
	assert_eq!(refreshed.refresh_token().map(|secret| secret.expose()), Some("refresh-new"));
	assert_eq!(validation.user_id.as_str(), "141981764");
	assert!(validation.scopes.contains("channel:edit:commercial"));
	assert!(matches!(validation.expires, Expiry::At(at) if at >= before + Duration::hours(4)));
}

#[tokio::test]
async fn rejected_refresh_token_is_an_invalid_grant() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(400).json_body(json!({ "status": 400, "message": "Invalid refresh token" }));
		})
		.await;

	let provider = RefreshTokenProvider::new(CLIENT_ID, CLIENT_SECRET)
		.expect("Refresh provider should build.")
		.with_endpoints(&endpoints(&server))
		.expect("Refresh provider should accept mock endpoints.");
	let err = provider
		.refresh(&owned_credential("access-old"))
		.await
		.expect_err("A 400 from the token endpoint should fail.");

	assert!(matches!(err, Error::InvalidGrant { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn client_credentials_mint_app_tokens_only() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.form_urlencoded_tuple("grant_type", "client_credentials");
			then.status(200).json_body(json!({
				"access_token": "app-new",
				"expires_in": 5011271,
				"token_type": "bearer"
			}));
		})
		.await;
	let provider = ClientCredentialsProvider::new(CLIENT_ID, CLIENT_SECRET)
		.expect("Client credentials provider should build.")
		.with_endpoints(&endpoints(&server))
		.expect("Client credentials provider should accept mock endpoints.");
	let minted =
		provider.refresh(&Credential::app("app-old")).await.expect("App token should mint.");
	let mismatch = provider
		.refresh(&Credential::user("user-token"))
		.await
		.expect_err("User credentials cannot use the client credentials grant.");

	assert_eq!(minted.kind(), CredentialKind::App);
	assert_eq!(minted.access_token().expose(), "app-new");
	assert!(minted.validation().is_none(), "App credentials carry no expiry metadata.");
	assert!(!minted.is_expired(OffsetDateTime::now_utc() + Duration::days(365)));
	assert!(matches!(mismatch, Error::Config(_)));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn session_refreshes_through_the_token_endpoint_and_validates() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).json_body(json!({
				"access_token": "access-new",
				"refresh_token": "refresh-new",
				"expires_in": 14400,
				"token_type": "bearer"
			}));
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer access-old");
			then.status(401).json_body(json!({ "status": 401, "message": "Invalid OAuth token" }));
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/helix/users").header("authorization", "Bearer access-new");
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let validate = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/validate").header("authorization", "OAuth access-new");
			then.status(200).json_body(json!({
				"client_id": CLIENT_ID,
				"login": "twitchdev",
				"scopes": ["user:read:email"],
				"user_id": "141981764",
				"expires_in": 14399
			}));
		})
		.await;
	let provider = RefreshTokenProvider::new(CLIENT_ID, CLIENT_SECRET)
		.expect("Refresh provider should build.")
		.with_endpoints(&endpoints(&server))
		.expect("Refresh provider should accept mock endpoints.");
	let session: ReqwestTestSession<UserToken> = build_reqwest_test_session(
		&server.base_url(),
		CLIENT_ID,
		Credential::user("access-old").with_refresh_token("refresh-old"),
	)
	.expect("Test session should build.")
	.with_provider(Arc::new(provider));
	let users = session.send(&GetUsers::default()).await.expect("Retry should succeed.");
	let validated = session.validate().await.expect("Validation should succeed.");

	assert!(users.data.is_empty());
	assert_eq!(validated.access_token().expose(), "access-new");
	assert_eq!(validated.user_id().map(|id| id.as_str()), Some("141981764"));
	assert_eq!(session.credential().user_id().map(|id| id.as_str()), Some("141981764"));

	token.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;
	validate.assert_calls_async(1).await;
}
