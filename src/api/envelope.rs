//! Uniform JSON envelope returned by every endpoint.

// crates.io
use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::Value;
// self
use crate::_prelude::*;

/// `{status, message, data}` response body; `data` serializes as `null` when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Envelope<T = Value> {
	/// `true` for success, `false` for any failure.
	pub status: bool,
	/// Human-readable outcome.
	pub message: &'static str,
	/// Operation payload.
	pub data: Option<T>,
}
impl<T> Envelope<T>
where
	T: Serialize,
{
	/// Successful envelope carrying `data`.
	pub fn success(message: &'static str, data: T) -> Self {
		Self { status: true, message, data: Some(data) }
	}

	/// Serializes the envelope as the body of a response with the given status code.
	pub fn into_response_with(self, status: StatusCode) -> Response {
		(status, Json(self)).into_response()
	}
}
impl Envelope {
	/// Failed envelope, optionally carrying diagnostic `data`.
	pub fn failure(message: &'static str, data: Option<Value>) -> Self {
		Self { status: false, message, data }
	}
}
