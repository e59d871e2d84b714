//! Request handlers for the three gateway endpoints plus the fallbacks.

// crates.io
use axum::{
	body::Bytes,
	extract::{State, rejection::BytesRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
};
// self
use crate::{
	_prelude::*,
	api::{Envelope, Failure, PayloadError, decode_body},
	gateway::{Gateway, LoginRequest, RefreshRequest, RegistrationRequest},
};

type HandlerResult = Result<Response, Response>;
type RawBody = Result<Bytes, BytesRejection>;

fn read_body(body: RawBody) -> Result<Bytes, Response> {
	body.map_err(|rejection| PayloadError(rejection).render())
}

/// `POST /register`.
pub async fn register(State(gateway): State<Arc<Gateway>>, body: RawBody) -> HandlerResult {
	let request = decode_body::<RegistrationRequest>(&read_body(body)?).map_err(Failure::render)?;
	let session = gateway.register(&request).await.map_err(Failure::render)?;

	Ok(Envelope::success("User registered successfully.", session)
		.into_response_with(StatusCode::CREATED))
}

/// `POST /login`.
pub async fn login(State(gateway): State<Arc<Gateway>>, body: RawBody) -> HandlerResult {
	let request = decode_body::<LoginRequest>(&read_body(body)?).map_err(Failure::render)?;
	let session = gateway.login(&request).await.map_err(Failure::render)?;

	Ok(Envelope::success("Login successful.", session).into_response_with(StatusCode::OK))
}

/// `POST /refresh`.
pub async fn refresh(State(gateway): State<Arc<Gateway>>, body: RawBody) -> HandlerResult {
	let request = decode_body::<RefreshRequest>(&read_body(body)?).map_err(Failure::render)?;
	let tokens = gateway.refresh(&request).await.map_err(Failure::render)?;

	Ok(Envelope::success("Token refreshed.", tokens).into_response_with(StatusCode::OK))
}

/// Any method other than `POST` on a known path.
pub async fn method_not_allowed() -> impl IntoResponse {
	Envelope::failure("Method not allowed.", None).into_response_with(StatusCode::METHOD_NOT_ALLOWED)
}

/// Any unknown path.
pub async fn not_found() -> impl IntoResponse {
	Envelope::failure("Not found.", None).into_response_with(StatusCode::NOT_FOUND)
}
