//! URL layout of a Keycloak-compatible identity provider.

// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoints the gateway calls, derived once from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdpEndpoints {
	/// Token endpoint of the end-user realm.
	pub token: Url,
	/// Token endpoint of the realm hosting the service account.
	pub admin_token: Url,
	/// Admin users collection of the end-user realm.
	pub users: Url,
}
impl IdpEndpoints {
	/// Derives the endpoints for `realm` (users) and `admin_realm` (service account).
	pub fn new(base: &Url, realm: &str, admin_realm: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			token: token_endpoint(base, realm)?,
			admin_token: token_endpoint(base, admin_realm)?,
			users: join(base, ["admin", "realms", realm, "users"])?,
		})
	}
}

fn token_endpoint(base: &Url, realm: &str) -> Result<Url, ConfigError> {
	join(base, ["realms", realm, "protocol", "openid-connect", "token"])
}

/// Appends percent-encoded path segments to `base`, dropping any query or fragment.
fn join<'a, I>(base: &Url, segments: I) -> Result<Url, ConfigError>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);
	url.path_segments_mut()
		.map_err(|_| ConfigError::UnsupportedIdpUrl { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}
