//! Admin credential acquisition for the provider's admin API.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	obs::{FlowKind, FlowSpan, FlowTimer},
	oauth::TokenFacade,
};

/// Boxed future returned by [`AdminCredentialProvider`] implementations.
pub type CredentialFuture<'a> = Pin<Box<dyn Future<Output = Result<Secret>> + 'a + Send>>;

/// Capability that yields a bearer token accepted by the admin API.
///
/// Flows call [`admin_token`](AdminCredentialProvider::admin_token) before every admin
/// operation and never hold on to the result, so an implementation only has to return a token
/// that is valid right now. Whether it memoizes is its own business.
pub trait AdminCredentialProvider
where
	Self: Send + Sync,
{
	/// Returns a currently valid admin bearer token.
	fn admin_token(&self) -> CredentialFuture<'_>;
}

/// Provider that performs a fresh password grant with the service account on every call.
#[derive(Clone)]
pub struct PasswordGrantCredentials {
	facade: TokenFacade,
	username: String,
	password: Secret,
}
impl PasswordGrantCredentials {
	/// Creates a provider for the service account `username` using `facade`'s client.
	pub fn new(facade: TokenFacade, username: impl Into<String>, password: Secret) -> Self {
		Self { facade, username: username.into(), password }
	}
}
impl AdminCredentialProvider for PasswordGrantCredentials {
	fn admin_token(&self) -> CredentialFuture<'_> {
		const KIND: FlowKind = FlowKind::AdminToken;

		Box::pin(async move {
			let span = FlowSpan::new(KIND, "admin_token");
			let timer = FlowTimer::start(KIND);
			let result = span
				.instrument(async {
					self.facade
						.exchange_password(&self.username, &self.password)
						.await
						.map(|pair| pair.access_token)
				})
				.await;

			timer.finish(&result);

			result
		})
	}
}
impl Debug for PasswordGrantCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordGrantCredentials")
			.field("token_endpoint", &self.facade.token_endpoint().as_str())
			.field("username", &self.username)
			.finish()
	}
}

/// Provider that hands out a fixed token, for deployments that mint admin tokens out of band.
#[derive(Clone, Debug)]
pub struct StaticCredentials(Secret);
impl StaticCredentials {
	/// Wraps a pre-issued admin token.
	pub fn new(token: Secret) -> Self {
		Self(token)
	}
}
impl AdminCredentialProvider for StaticCredentials {
	fn admin_token(&self) -> CredentialFuture<'_> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}
