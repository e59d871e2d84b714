//! Gateway flows orchestrated against the identity provider.
//!
//! [`Gateway`] is built once from a [`GatewayConfig`] and shared read-only by every request.
//! Each flow lives in its own module and returns a dedicated error enum so the HTTP layer can
//! map outcomes to status codes without inspecting strings.

pub mod login;
pub mod refresh;
pub mod register;

pub use login::*;
pub use refresh::*;
pub use register::*;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, UserView},
	config::GatewayConfig,
	http::ReqwestHttpClient,
	idp::{AdminClient, AdminCredentialProvider, IdpEndpoints, PasswordGrantCredentials},
	oauth::TokenFacade,
};

/// Authenticated user plus the tokens issued for them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
	/// Identity projection.
	pub user: UserView,
	/// Token pair, flattened next to `user`.
	#[serde(flatten)]
	pub tokens: TokenPair,
}

/// Entry point for the register, login, and refresh flows.
///
/// Holds derived endpoints, the token client bound to the mobile client, the admin users
/// client, and the admin credential provider. Nothing in here changes after construction.
#[derive(Clone)]
pub struct Gateway {
	/// Endpoints derived from the configured IdP URL and realms.
	pub endpoints: IdpEndpoints,
	user_tokens: TokenFacade,
	admin: AdminClient,
	admin_credentials: Arc<dyn AdminCredentialProvider>,
}
impl Gateway {
	/// Builds a gateway with the default HTTP client.
	pub fn new(config: &GatewayConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::build()?)
	}

	/// Builds a gateway that sends every IdP request through `http_client`.
	///
	/// Admin tokens are obtained with a fresh password grant for the configured service
	/// account each time they are needed.
	pub fn with_http_client(config: &GatewayConfig, http_client: ReqwestHttpClient) -> Result<Self> {
		let endpoints = IdpEndpoints::new(&config.idp_url, &config.realm, &config.admin_realm)?;
		let user_tokens =
			TokenFacade::new(&endpoints.token, &config.mobile_client_id, http_client.clone());
		let admin_tokens =
			TokenFacade::new(&endpoints.admin_token, &config.admin_client_id, http_client.clone());
		let admin_credentials = Arc::new(PasswordGrantCredentials::new(
			admin_tokens,
			config.admin_username.clone(),
			config.admin_password.clone(),
		));
		let admin = AdminClient::new(endpoints.users.clone(), http_client);

		Ok(Self { endpoints, user_tokens, admin, admin_credentials })
	}

	/// Replaces the admin credential provider.
	pub fn with_admin_credentials(mut self, provider: Arc<dyn AdminCredentialProvider>) -> Self {
		self.admin_credentials = provider;

		self
	}
}
impl Debug for Gateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("endpoints", &self.endpoints)
			.field("user_tokens", &self.user_tokens)
			.finish_non_exhaustive()
	}
}
