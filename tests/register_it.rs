// crates.io
use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use httpmock::prelude::*;
use serde_json::Value;
use tower::ServiceExt;
// self
use idp_gateway::{_preludet::*, api, auth::Secret, idp::StaticCredentials};

const REGISTER_BODY: &str = r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","phoneNumber":"+44 20 7946 0000","password":"correct-horse"}"#;
const CREATED_USER: &str = r#"[{"id":"6f1c","username":"ada@example.com","email":"ada@example.com","firstName":"Ada","lastName":"Lovelace"}]"#;

async fn post(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
	let request = Request::builder()
		.method("POST")
		.uri(uri)
		.body(Body::from(body))
		.expect("Request should build.");
	let response = app.oneshot(request).await.expect("Router should not fail.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Response body should be readable.");

	(status, serde_json::from_slice(&bytes).expect("Response body should be a JSON envelope."))
}

fn app(server: &MockServer) -> Router {
	api::router(Arc::new(build_test_gateway(&server.base_url())))
}

async fn mock_admin_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(admin_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("admin-access", "admin-refresh"));
		})
		.await
}

#[tokio::test]
async fn registration_creates_user_logs_in_and_resolves_id() {
	let server = MockServer::start_async().await;
	let admin_token = mock_admin_token(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(users_path()).header("authorization", "Bearer admin-access");
			then.status(201);
		})
		.await;
	let user_token = server
		.mock_async(|when, then| {
			when.method(POST).path(user_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("user-access", "user-refresh"));
		})
		.await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(users_path())
				.query_param("email", "ada@example.com")
				.header("authorization", "Bearer admin-access");
			then.status(200).header("content-type", "application/json").body(CREATED_USER);
		})
		.await;
	let (status, body) = post(app(&server), "/register", REGISTER_BODY).await;

	// One admin token for the creation, a fresh one for the lookup.
	admin_token.assert_calls_async(2).await;
	create.assert_async().await;
	user_token.assert_async().await;
	lookup.assert_async().await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["status"], true);
	assert_eq!(body["message"], "User registered successfully.");
	assert_eq!(body["data"]["user"]["id"], "6f1c");
	assert_eq!(body["data"]["user"]["username"], "ada@example.com");
	assert_eq!(body["data"]["user"]["firstName"], "Ada");
	assert_eq!(body["data"]["access_token"], "user-access");
	assert_eq!(body["data"]["refresh_token"], "user-refresh");
}

#[tokio::test]
async fn conflicting_account_relays_provider_body() {
	let server = MockServer::start_async().await;
	let provider_body = r#"{"errorMessage":"User exists with same email"}"#;

	mock_admin_token(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(users_path());
			then.status(409).header("content-type", "application/json").body(provider_body);
		})
		.await;
	let user_token = server
		.mock_async(|when, then| {
			when.method(POST).path(user_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("user-access", "user-refresh"));
		})
		.await;
	let (status, body) = post(app(&server), "/register", REGISTER_BODY).await;

	create.assert_async().await;
	user_token.assert_calls_async(0).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["status"], false);
	assert_eq!(body["message"], "User creation failed.");
	assert_eq!(body["data"], provider_body);
}

#[tokio::test]
async fn login_failure_after_creation_is_a_server_error() {
	let server = MockServer::start_async().await;

	mock_admin_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(users_path());
			then.status(201);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(user_token_path());
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"Account is not fully set up\"}");
		})
		.await;

	let (status, body) = post(app(&server), "/register", REGISTER_BODY).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["message"], "User login after registration failed.");
	assert!(body["data"].is_null());
}

#[tokio::test]
async fn empty_lookup_after_creation_is_a_server_error() {
	let server = MockServer::start_async().await;

	mock_admin_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(users_path());
			then.status(201);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(user_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("user-access", "user-refresh"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(users_path());
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;

	let (status, body) = post(app(&server), "/register", REGISTER_BODY).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["message"], "Failed to fetch user data.");
}

#[tokio::test]
async fn preissued_admin_token_skips_the_service_account_grant() {
	let server = MockServer::start_async().await;
	let admin_token = mock_admin_token(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(users_path()).header("authorization", "Bearer preissued");
			then.status(201);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(user_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("user-access", "user-refresh"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(users_path()).header("authorization", "Bearer preissued");
			then.status(200).header("content-type", "application/json").body(CREATED_USER);
		})
		.await;

	let gateway = build_test_gateway(&server.base_url())
		.with_admin_credentials(Arc::new(StaticCredentials::new(Secret::new("preissued"))));
	let (status, _) = post(api::router(Arc::new(gateway)), "/register", REGISTER_BODY).await;

	admin_token.assert_calls_async(0).await;
	create.assert_async().await;

	assert_eq!(status, StatusCode::CREATED);
}
