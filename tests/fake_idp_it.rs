//! Drives the gateway against a small stateful identity provider so registration, login, and
//! refresh observe each other's effects.

// std
use std::collections::HashMap;
// crates.io
use axum::{
	Form, Json, Router,
	body::{self, Body},
	extract::{Path, Query, State},
	http::{HeaderMap, Request, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
// self
use idp_gateway::{_preludet::*, api};

#[derive(Clone, Debug)]
struct StoredUser {
	id: String,
	email: String,
	first_name: String,
	last_name: String,
	phone_number: String,
	password: String,
}

#[derive(Default)]
struct Directory {
	users: Mutex<Vec<StoredUser>>,
}

type Shared = Arc<Directory>;

fn oauth_error(status: StatusCode, error: &str) -> Response {
	(status, Json(json!({ "error": error, "error_description": "Rejected by fake IdP" })))
		.into_response()
}

fn issue(access: String, refresh: String) -> Response {
	Json(json!({
		"access_token": access,
		"refresh_token": refresh,
		"token_type": "Bearer",
		"expires_in": 300,
	}))
	.into_response()
}

async fn token(
	State(directory): State<Shared>,
	Path(realm): Path<String>,
	Form(form): Form<HashMap<String, String>>,
) -> Response {
	let field = |name: &str| form.get(name).map(String::as_str).unwrap_or_default();

	if realm == TEST_ADMIN_REALM {
		let admin = field("client_id") == TEST_ADMIN_CLIENT
			&& field("grant_type") == "password"
			&& field("username") == TEST_ADMIN_USERNAME
			&& field("password") == TEST_ADMIN_PASSWORD;

		return if admin {
			issue("admin-token".into(), "admin-refresh".into())
		} else {
			oauth_error(StatusCode::UNAUTHORIZED, "invalid_client")
		};
	}
	if realm != TEST_REALM || field("client_id") != TEST_MOBILE_CLIENT {
		return oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");
	}

	let users = directory.users.lock();
	let user = match field("grant_type") {
		"password" => users
			.iter()
			.find(|user| user.email == field("username") && user.password == field("password")),
		"refresh_token" => field("refresh_token")
			.strip_prefix("refresh-")
			.and_then(|id| users.iter().find(|user| user.id == id)),
		_ => None,
	};

	match user {
		Some(user) => issue(format!("access-{}", user.id), format!("refresh-{}", user.id)),
		None => oauth_error(StatusCode::BAD_REQUEST, "invalid_grant"),
	}
}

fn authorized(headers: &HeaderMap) -> bool {
	headers.get(header::AUTHORIZATION).and_then(|value| value.to_str().ok())
		== Some("Bearer admin-token")
}

async fn create_user(
	State(directory): State<Shared>,
	headers: HeaderMap,
	Json(payload): Json<Value>,
) -> Response {
	if !authorized(&headers) {
		return StatusCode::UNAUTHORIZED.into_response();
	}

	let text = |pointer: &str| payload.pointer(pointer).and_then(Value::as_str).unwrap_or_default();
	let email = text("/email").to_owned();
	let mut users = directory.users.lock();

	if users.iter().any(|user| user.email == email) {
		return (StatusCode::CONFLICT, Json(json!({ "errorMessage": "User exists with same email" })))
			.into_response();
	}
	if payload["enabled"] != true
		|| text("/username") != email
		|| payload["credentials"][0]["temporary"] != false
		|| text("/credentials/0/type") != "password"
	{
		return StatusCode::BAD_REQUEST.into_response();
	}

	let id = format!("user-{}", users.len() + 1);

	users.push(StoredUser {
		id,
		email,
		first_name: text("/firstName").to_owned(),
		last_name: text("/lastName").to_owned(),
		phone_number: text("/attributes/phone_number/0").to_owned(),
		password: text("/credentials/0/value").to_owned(),
	});

	StatusCode::CREATED.into_response()
}

async fn find_users(
	State(directory): State<Shared>,
	headers: HeaderMap,
	Query(query): Query<HashMap<String, String>>,
) -> Response {
	if !authorized(&headers) {
		return StatusCode::UNAUTHORIZED.into_response();
	}

	let email = query.get("email").cloned().unwrap_or_default();
	let matches = directory
		.users
		.lock()
		.iter()
		.filter(|user| user.email == email)
		.map(|user| {
			json!({
				"id": user.id,
				"username": user.email,
				"email": user.email,
				"firstName": user.first_name,
				"lastName": user.last_name,
				"attributes": { "phone_number": [user.phone_number] },
			})
		})
		.collect::<Vec<_>>();

	Json(matches).into_response()
}

async fn start_fake_idp() -> (String, Shared) {
	let directory = Shared::default();
	let app = Router::new()
		.route("/realms/{realm}/protocol/openid-connect/token", post(token))
		.route("/admin/realms/{realm}/users", get(find_users).post(create_user))
		.with_state(directory.clone());
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Fake IdP should bind.");
	let addr = listener.local_addr().expect("Fake IdP should expose its address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});

	(format!("http://{addr}"), directory)
}

async fn call(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
	let request = Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.expect("Request should build.");
	let response = app.clone().oneshot(request).await.expect("Router should not fail.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Response body should be readable.");

	(status, serde_json::from_slice(&bytes).expect("Response body should be a JSON envelope."))
}

fn registration(email: &str, password: &str) -> Value {
	json!({
		"firstName": "Grace",
		"lastName": "Hopper",
		"email": email,
		"phoneNumber": "+1 555 0100",
		"password": password,
	})
}

#[tokio::test]
async fn registered_users_can_log_in_and_refresh() {
	let (idp_url, directory) = start_fake_idp().await;
	let app = api::router(Arc::new(build_test_gateway(&idp_url)));
	let (status, registered) =
		call(&app, "/register", registration("grace@example.com", "cobol")).await;

	assert_eq!(status, StatusCode::CREATED, "{registered}");

	let id = registered["data"]["user"]["id"].as_str().expect("Registered user id.").to_owned();

	assert_eq!(registered["data"]["access_token"], format!("access-{id}"));

	{
		let users = directory.users.lock();

		assert_eq!(users.len(), 1);
		assert_eq!(users[0].phone_number, "+1 555 0100");
		assert_eq!(users[0].password, "cobol");
	}

	let (status, logged_in) = call(
		&app,
		"/login",
		json!({ "email": "grace@example.com", "password": "cobol" }),
	)
	.await;

	assert_eq!(status, StatusCode::OK, "{logged_in}");
	assert_eq!(logged_in["data"]["user"], registered["data"]["user"]);

	let refresh_token = logged_in["data"]["refresh_token"].clone();
	let (status, refreshed) = call(&app, "/refresh", json!({ "refreshToken": refresh_token })).await;

	assert_eq!(status, StatusCode::OK, "{refreshed}");
	assert_eq!(refreshed["message"], "Token refreshed.");
	assert_eq!(refreshed["data"]["access_token"], format!("access-{id}"));
}

#[tokio::test]
async fn duplicate_registration_is_rejected_without_side_effects() {
	let (idp_url, directory) = start_fake_idp().await;
	let app = api::router(Arc::new(build_test_gateway(&idp_url)));
	let (status, _) = call(&app, "/register", registration("grace@example.com", "cobol")).await;

	assert_eq!(status, StatusCode::CREATED);

	let (status, duplicate) =
		call(&app, "/register", registration("grace@example.com", "fortran")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(duplicate["status"], false);
	assert!(
		duplicate["data"].as_str().is_some_and(|body| body.contains("User exists with same email"))
	);
	assert_eq!(directory.users.lock().len(), 1);

	// The rejected password never took effect.
	let (status, _) = call(
		&app,
		"/login",
		json!({ "email": "grace@example.com", "password": "fortran" }),
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_refresh_tokens_are_unauthorized() {
	let (idp_url, _) = start_fake_idp().await;
	let app = api::router(Arc::new(build_test_gateway(&idp_url)));
	let (status, body) = call(&app, "/refresh", json!({ "refreshToken": "refresh-ghost" })).await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["message"], "Invalid refresh token.");
}
