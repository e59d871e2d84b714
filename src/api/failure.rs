//! Mapping from flow errors to HTTP status codes and envelopes.

// crates.io
use axum::{extract::rejection::BytesRejection, http::StatusCode, response::Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::Envelope,
	gateway::{LoginError, RefreshError, RegisterError},
};

/// An error that knows how it is presented to HTTP clients.
pub trait Failure
where
	Self: StdError,
{
	/// HTTP status code of the response.
	fn status_code(&self) -> StatusCode;

	/// Envelope message.
	fn message(&self) -> &'static str;

	/// Envelope payload; `None` by default.
	fn data(&self) -> Option<Value> {
		None
	}

	/// Renders the failure envelope.
	fn render(self) -> Response
	where
		Self: Sized,
	{
		Envelope::failure(self.message(), self.data()).into_response_with(self.status_code())
	}
}

/// Request body is not valid JSON or does not have the expected shape.
#[derive(Debug, ThisError)]
#[error("Request body could not be decoded.")]
pub struct BodyError(#[source] pub serde_path_to_error::Error<serde_json::Error>);
impl Failure for BodyError {
	fn status_code(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}

	fn message(&self) -> &'static str {
		"Invalid request body."
	}
}

/// Request body could not be buffered, usually because it exceeds the size limit.
#[derive(Debug, ThisError)]
#[error("Request body could not be read.")]
pub struct PayloadError(#[source] pub BytesRejection);
impl Failure for PayloadError {
	fn status_code(&self) -> StatusCode {
		self.0.status()
	}

	fn message(&self) -> &'static str {
		if self.status_code() == StatusCode::PAYLOAD_TOO_LARGE {
			"Request body too large."
		} else {
			"Invalid request body."
		}
	}
}

/// Decodes the first JSON value of a request body, ignoring its declared content type.
pub fn decode_body<T>(bytes: &[u8]) -> Result<T, BodyError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de).map_err(BodyError)
}

impl Failure for RegisterError {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::UserCreationRejected { .. } => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> &'static str {
		match self {
			Self::AdminCredential(_) => "Failed to obtain admin token.",
			Self::UserCreationRejected { .. } => "User creation failed.",
			Self::UserCreation(_) => "Failed to create user.",
			Self::Login(_) => "User login after registration failed.",
			Self::Lookup(_) | Self::UserMissing => "Failed to fetch user data.",
		}
	}

	fn data(&self) -> Option<Value> {
		match self {
			Self::UserCreationRejected { body, .. } => Some(Value::String(body.clone())),
			_ => None,
		}
	}
}

impl Failure for LoginError {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
			Self::UserNotFound => StatusCode::NOT_FOUND,
			Self::TokenEndpoint(_) | Self::AdminCredential(_) | Self::Lookup(_) =>
				StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> &'static str {
		match self {
			Self::InvalidCredentials(_) => "Invalid credentials.",
			Self::TokenEndpoint(_) => "Login request failed.",
			Self::AdminCredential(_) => "Failed to obtain admin token.",
			Self::Lookup(_) => "Failed to fetch user data.",
			Self::UserNotFound => "User not found.",
		}
	}
}

impl Failure for RefreshError {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::MissingToken => StatusCode::BAD_REQUEST,
			Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
			Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> &'static str {
		match self {
			Self::MissingToken | Self::InvalidToken(_) => "Invalid refresh token.",
			Self::Transport(_) => "Refresh request failed.",
		}
	}
}
