//! Password login followed by a profile lookup.

// self
use crate::{
	_prelude::*,
	auth::{Secret, UserView},
	gateway::{Gateway, Session},
	obs::{FlowKind, FlowSpan, FlowTimer},
};

/// Body of `POST /login`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
	/// Email address used as the username.
	pub email: String,
	/// Account password.
	pub password: Secret,
}

/// Failures of the login flow.
#[derive(Debug, ThisError)]
pub enum LoginError {
	/// The provider did not issue tokens for these credentials.
	#[error("Credentials were rejected.")]
	InvalidCredentials(#[source] Error),
	/// The token endpoint could not be reached.
	#[error("Token endpoint is unreachable.")]
	TokenEndpoint(#[source] Error),
	/// No admin token could be obtained.
	#[error("Admin token could not be obtained.")]
	AdminCredential(#[source] Error),
	/// The profile lookup failed.
	#[error("User lookup failed.")]
	Lookup(#[source] Error),
	/// Authentication succeeded but no user matches the email.
	#[error("No user matches the authenticated email.")]
	UserNotFound,
}

impl Gateway {
	/// Authenticates `request.email` and returns a session with the stored profile.
	pub async fn login(&self, request: &LoginRequest) -> Result<Session, LoginError> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");
		let timer = FlowTimer::start(KIND);
		let result = span.instrument(self.login_inner(request)).await;

		timer.finish(&result);

		result
	}

	async fn login_inner(&self, request: &LoginRequest) -> Result<Session, LoginError> {
		let tokens = self
			.user_tokens
			.exchange_password(&request.email, &request.password)
			.await
			.map_err(|err| {
				if err.is_unreachable() {
					LoginError::TokenEndpoint(err)
				} else {
					LoginError::InvalidCredentials(err)
				}
			})?;
		let admin_token =
			self.admin_credentials.admin_token().await.map_err(LoginError::AdminCredential)?;
		let record = self
			.admin
			.find_users_by_email(&admin_token, &request.email)
			.await
			.map_err(LoginError::Lookup)?
			.into_iter()
			.next()
			.ok_or(LoginError::UserNotFound)?;

		Ok(Session { user: UserView::from(record), tokens })
	}
}
