//! Account registration: create the user, log them in, and resolve their provider id.
//!
//! The steps are not transactional. Once the account exists on the provider a later failure
//! leaves it in place and the caller sees a server error; retrying with the same email then
//! conflicts with the existing account.

// self
use crate::{
	_prelude::*,
	auth::{NewUser, Secret, UserView},
	gateway::{Gateway, Session},
	obs::{FlowKind, FlowSpan, FlowTimer},
};

/// Body of `POST /register`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Email address; also used as the username.
	pub email: String,
	/// Phone number, stored as a custom user attribute.
	pub phone_number: String,
	/// Initial password, registered as a permanent credential.
	pub password: Secret,
}

/// Failures of the registration flow.
#[derive(Debug, ThisError)]
pub enum RegisterError {
	/// No admin token could be obtained.
	#[error("Admin token could not be obtained.")]
	AdminCredential(#[source] Error),
	/// The provider refused to create the account.
	#[error("Identity provider rejected the new account with HTTP {status}.")]
	UserCreationRejected {
		/// HTTP status code returned by the admin API.
		status: u16,
		/// Raw response body, relayed to the client.
		body: String,
	},
	/// The account creation request itself failed.
	#[error("Account creation request failed.")]
	UserCreation(#[source] Error),
	/// The freshly created account could not log in.
	#[error("Login after registration failed.")]
	Login(#[source] Error),
	/// The post-registration user lookup failed.
	#[error("User lookup after registration failed.")]
	Lookup(#[source] Error),
	/// The lookup succeeded but returned no user.
	#[error("Registered user was not found by email.")]
	UserMissing,
}

impl Gateway {
	/// Registers a new account and returns a session for it.
	pub async fn register(&self, request: &RegistrationRequest) -> Result<Session, RegisterError> {
		const KIND: FlowKind = FlowKind::Register;

		let span = FlowSpan::new(KIND, "register");
		let timer = FlowTimer::start(KIND);
		let result = span.instrument(self.register_inner(request)).await;

		timer.finish(&result);

		result
	}

	async fn register_inner(&self, request: &RegistrationRequest) -> Result<Session, RegisterError> {
		let admin_token =
			self.admin_credentials.admin_token().await.map_err(RegisterError::AdminCredential)?;
		let new_user = NewUser::new(
			&request.email,
			&request.first_name,
			&request.last_name,
			&request.phone_number,
			&request.password,
		);

		self.admin.create_user(&admin_token, &new_user).await.map_err(|err| match err {
			Error::UpstreamStatus { status, body } =>
				RegisterError::UserCreationRejected { status, body },
			other => RegisterError::UserCreation(other),
		})?;

		let tokens = self
			.user_tokens
			.exchange_password(&request.email, &request.password)
			.await
			.map_err(RegisterError::Login)?;
		let admin_token =
			self.admin_credentials.admin_token().await.map_err(RegisterError::AdminCredential)?;
		let id = self
			.admin
			.find_users_by_email(&admin_token, &request.email)
			.await
			.map_err(RegisterError::Lookup)?
			.into_iter()
			.next()
			.map(|record| record.id)
			.ok_or(RegisterError::UserMissing)?;

		Ok(Session {
			user: UserView {
				id,
				username: request.email.clone(),
				email: Some(request.email.clone()),
				first_name: Some(request.first_name.clone()),
				last_name: Some(request.last_name.clone()),
			},
			tokens,
		})
	}
}
