//! Refresh token exchange on behalf of the mobile client.

// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenPair},
	gateway::Gateway,
	obs::{FlowKind, FlowSpan, FlowTimer},
};

/// Body of `POST /refresh`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
	/// Refresh token previously issued to the client; absent and empty are treated alike.
	#[serde(default)]
	pub refresh_token: Option<Secret>,
}

/// Failures of the refresh flow.
#[derive(Debug, ThisError)]
pub enum RefreshError {
	/// The request carried no refresh token.
	#[error("Refresh token is missing.")]
	MissingToken,
	/// The provider did not accept the refresh token.
	#[error("Refresh token was rejected.")]
	InvalidToken(#[source] Error),
	/// The token endpoint could not be reached.
	#[error("Token endpoint is unreachable.")]
	Transport(#[source] Error),
}

impl Gateway {
	/// Exchanges `request.refresh_token` for a new token pair.
	pub async fn refresh(&self, request: &RefreshRequest) -> Result<TokenPair, RefreshError> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");
		let timer = FlowTimer::start(KIND);
		let result = span
			.instrument(async {
				let token = request
					.refresh_token
					.as_ref()
					.filter(|token| !token.is_empty())
					.ok_or(RefreshError::MissingToken)?;

				self.user_tokens.exchange_refresh_token(token).await.map_err(|err| {
					if err.is_unreachable() {
						RefreshError::Transport(err)
					} else {
						RefreshError::InvalidToken(err)
					}
				})
			})
			.await;

		timer.finish(&result);

		result
	}
}
