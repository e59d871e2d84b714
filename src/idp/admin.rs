//! Admin user API client.

// self
use crate::{
	_prelude::*,
	auth::{NewUser, Secret, UserRecord},
	error::{self, TransportError},
	http::ReqwestHttpClient,
};

/// Client for the provider's admin users collection.
///
/// Every call takes the bearer token explicitly; the client holds no credentials.
#[derive(Clone, Debug)]
pub struct AdminClient {
	users: Url,
	http_client: ReqwestHttpClient,
}
impl AdminClient {
	/// Creates a client for the given users collection endpoint.
	pub fn new(users: Url, http_client: ReqwestHttpClient) -> Self {
		Self { users, http_client }
	}

	/// Creates a user account.
	///
	/// Any non-2xx answer (duplicate email, policy violation, ...) is returned as
	/// [`Error::UpstreamStatus`] carrying the provider's raw body.
	pub async fn create_user(&self, admin_token: &Secret, user: &NewUser<'_>) -> Result<()> {
		let response = self
			.http_client
			.post(self.users.clone())
			.bearer_auth(admin_token.expose())
			.json(user)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if status.is_success() {
			return Ok(());
		}

		let body = response.text().await.map_err(TransportError::from)?;

		Err(Error::UpstreamStatus { status: status.as_u16(), body })
	}

	/// Returns the users whose email matches `email` exactly.
	pub async fn find_users_by_email(
		&self,
		admin_token: &Secret,
		email: &str,
	) -> Result<Vec<UserRecord>> {
		let mut url = self.users.clone();

		url.query_pairs_mut().append_pair("email", email).append_pair("exact", "true");

		let response = self
			.http_client
			.get(url)
			.bearer_auth(admin_token.expose())
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(Error::UpstreamStatus {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		error::decode_json(&body, Some(status.as_u16()))
	}
}
