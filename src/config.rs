//! Gateway configuration: an immutable value built once at startup.
//!
//! [`GatewayConfig::load`] reads an optional `.env` file and then the process environment;
//! [`GatewayConfig::from_lookup`] applies the same rules to any key lookup, and
//! [`GatewayConfig::builder`] assembles a value in code. All three paths run the same
//! validation.

// std
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Base URL of the identity provider.
pub const ENV_IDP_URL: &str = "KEYCLOAK_URL";
/// Realm holding end users.
pub const ENV_REALM: &str = "REALM";
/// Realm holding the service account; defaults to [`ENV_REALM`].
pub const ENV_ADMIN_REALM: &str = "ADMIN_REALM";
/// Service account username.
pub const ENV_ADMIN_USERNAME: &str = "ADMIN_USERNAME";
/// Service account password.
pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
/// Client used for the service account's password grant.
pub const ENV_ADMIN_CLIENT_ID: &str = "ADMIN_CLIENT_ID";
/// Public client used for end-user grants.
pub const ENV_MOBILE_CLIENT_ID: &str = "MOBILE_CLIENT_ID";
/// Socket address the HTTP listener binds to.
pub const ENV_LISTEN_ADDR: &str = "LISTEN_ADDR";

/// Immutable gateway settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	/// Identity provider base URL.
	pub idp_url: Url,
	/// Realm holding end users.
	pub realm: String,
	/// Realm holding the service account.
	pub admin_realm: String,
	/// Service account username.
	pub admin_username: String,
	/// Service account password.
	pub admin_password: Secret,
	/// Client used for the service account's password grant.
	pub admin_client_id: String,
	/// Public client used for end-user grants.
	pub mobile_client_id: String,
	/// Socket address the HTTP listener binds to.
	pub listen_addr: SocketAddr,
}
impl GatewayConfig {
	/// Listen address used when none is configured.
	pub const DEFAULT_LISTEN_ADDR: SocketAddr =
		SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 5000));

	/// Creates a new builder for the provided IdP base URL.
	pub fn builder(idp_url: Url) -> GatewayConfigBuilder {
		GatewayConfigBuilder::new(idp_url)
	}

	/// Loads `.env` (when present) into the environment, then reads the configuration from it.
	pub fn load() -> Result<Self, ConfigError> {
		// A missing `.env` is normal outside development.
		let _ = dotenvy::dotenv();

		Self::from_env()
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the configuration through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
		let required =
			|key: &'static str| non_blank(key).ok_or(ConfigError::MissingSetting { name: key });
		let idp_url = Url::parse(required(ENV_IDP_URL)?.trim())
			.map_err(|source| ConfigError::InvalidIdpUrl { source })?;
		let mut builder = Self::builder(idp_url)
			.realm(required(ENV_REALM)?)
			.admin_credentials(
				required(ENV_ADMIN_USERNAME)?,
				Secret::new(required(ENV_ADMIN_PASSWORD)?),
			)
			.admin_client_id(required(ENV_ADMIN_CLIENT_ID)?)
			.mobile_client_id(required(ENV_MOBILE_CLIENT_ID)?);

		if let Some(admin_realm) = non_blank(ENV_ADMIN_REALM) {
			builder = builder.admin_realm(admin_realm);
		}
		if let Some(raw) = non_blank(ENV_LISTEN_ADDR) {
			let addr: SocketAddr = raw
				.trim()
				.parse()
				.map_err(|source| ConfigError::InvalidListenAddr { value: raw.clone(), source })?;

			builder = builder.listen_addr(addr);
		}

		builder.build()
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug)]
pub struct GatewayConfigBuilder {
	/// Identity provider base URL.
	pub idp_url: Url,
	/// Realm holding end users.
	pub realm: String,
	/// Realm holding the service account; falls back to `realm` when unset.
	pub admin_realm: Option<String>,
	/// Service account username.
	pub admin_username: String,
	/// Service account password.
	pub admin_password: Secret,
	/// Client used for the service account's password grant.
	pub admin_client_id: String,
	/// Public client used for end-user grants.
	pub mobile_client_id: String,
	/// Socket address the HTTP listener binds to.
	pub listen_addr: SocketAddr,
}
impl GatewayConfigBuilder {
	/// Creates a new builder seeded with the provided IdP base URL.
	pub fn new(idp_url: Url) -> Self {
		Self {
			idp_url,
			realm: String::new(),
			admin_realm: None,
			admin_username: String::new(),
			admin_password: Secret::new(""),
			admin_client_id: String::new(),
			mobile_client_id: String::new(),
			listen_addr: GatewayConfig::DEFAULT_LISTEN_ADDR,
		}
	}

	/// Sets the end-user realm.
	pub fn realm(mut self, realm: impl Into<String>) -> Self {
		self.realm = realm.into();

		self
	}

	/// Sets the realm hosting the service account.
	pub fn admin_realm(mut self, realm: impl Into<String>) -> Self {
		self.admin_realm = Some(realm.into());

		self
	}

	/// Sets the service account credentials.
	pub fn admin_credentials(mut self, username: impl Into<String>, password: Secret) -> Self {
		self.admin_username = username.into();
		self.admin_password = password;

		self
	}

	/// Sets the client used for the service account's password grant.
	pub fn admin_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.admin_client_id = client_id.into();

		self
	}

	/// Sets the public client used for end-user grants.
	pub fn mobile_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.mobile_client_id = client_id.into();

		self
	}

	/// Overrides the listen address.
	pub fn listen_addr(mut self, addr: SocketAddr) -> Self {
		self.listen_addr = addr;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		let admin_realm = self.admin_realm.unwrap_or_else(|| self.realm.clone());
		let config = GatewayConfig {
			idp_url: self.idp_url,
			realm: self.realm,
			admin_realm,
			admin_username: self.admin_username,
			admin_password: self.admin_password,
			admin_client_id: self.admin_client_id,
			mobile_client_id: self.mobile_client_id,
			listen_addr: self.listen_addr,
		};

		config.validate()?;

		Ok(config)
	}
}

impl GatewayConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ConfigError> {
		if !matches!(self.idp_url.scheme(), "http" | "https") || self.idp_url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedIdpUrl { url: self.idp_url.to_string() });
		}

		require(ENV_REALM, &self.realm)?;
		require(ENV_ADMIN_REALM, &self.admin_realm)?;
		require(ENV_ADMIN_USERNAME, &self.admin_username)?;
		require(ENV_ADMIN_CLIENT_ID, &self.admin_client_id)?;
		require(ENV_MOBILE_CLIENT_ID, &self.mobile_client_id)?;

		Ok(())
	}
}

fn require(name: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() { Err(ConfigError::MissingSetting { name }) } else { Ok(()) }
}
