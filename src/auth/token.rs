//! Token pair issued by the identity provider for an end user.

// self
use crate::{_prelude::*, auth::Secret};

/// Access + refresh token pair relayed to the client untouched.
///
/// The gateway never inspects the tokens; it only forwards what the provider issued.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenPair {
	/// Bearer access token.
	pub access_token: Secret,
	/// Refresh token, when the provider issued one.
	pub refresh_token: Option<Secret>,
}
impl TokenPair {
	/// Creates a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			refresh_token: refresh_token.map(Secret::new),
		}
	}
}
