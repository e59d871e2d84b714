//! OAuth token endpoint facade: resource-owner password and refresh-token grants.

pub use oauth2;

// std
use std::time::Duration;
// crates.io
use oauth2::{
	AccessToken, AuthType, Client, ClientId, EndpointNotSet, EndpointSet, HttpClientError,
	RefreshToken, RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, Scope,
	StandardRevocableToken, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenPair},
	error::{ConfigError, MalformedResponseError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredClient = Client<
	BasicErrorResponse,
	TokenEndpointResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Successful token endpoint body.
///
/// Only `access_token` is required. A missing `token_type` is read as `Bearer`, so providers
/// that omit it are still accepted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenEndpointResponse {
	access_token: AccessToken,
	#[serde(default = "bearer")]
	token_type: BasicTokenType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	expires_in: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	refresh_token: Option<RefreshToken>,
}
impl TokenResponse for TokenEndpointResponse {
	type TokenType = BasicTokenType;

	fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	fn token_type(&self) -> &Self::TokenType {
		&self.token_type
	}

	fn expires_in(&self) -> Option<Duration> {
		self.expires_in.map(Duration::from_secs)
	}

	fn refresh_token(&self) -> Option<&RefreshToken> {
		self.refresh_token.as_ref()
	}

	fn scopes(&self) -> Option<&Vec<Scope>> {
		None
	}
}

fn bearer() -> BasicTokenType {
	BasicTokenType::Bearer
}

/// Grant types the gateway issues against the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantType {
	/// Resource owner password credentials.
	Password,
	/// Refresh token rotation.
	RefreshToken,
}
impl GrantType {
	/// Returns the OAuth `grant_type` value.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::Password => "password",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token endpoint client bound to one OAuth client identifier.
///
/// The client is public: `client_id` travels in the form body and no secret is sent.
#[derive(Clone, Debug)]
pub struct TokenFacade {
	oauth_client: ConfiguredClient,
	http_client: ReqwestHttpClient,
}
impl TokenFacade {
	/// Creates a facade for `client_id` against the given token endpoint.
	pub fn new(token_endpoint: &Url, client_id: &str, http_client: ReqwestHttpClient) -> Self {
		let oauth_client: ConfiguredClient = Client::new(ClientId::new(client_id.to_owned()))
			.set_token_uri(TokenUrl::from_url(token_endpoint.clone()))
			.set_auth_type(AuthType::RequestBody);

		Self { oauth_client, http_client }
	}

	/// Returns the token endpoint this facade talks to.
	pub fn token_endpoint(&self) -> &Url {
		self.oauth_client.token_uri().url()
	}

	/// Performs the `password` grant for `username`.
	pub async fn exchange_password(&self, username: &str, password: &Secret) -> Result<TokenPair> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let username = ResourceOwnerUsername::new(username.to_owned());
		let password = ResourceOwnerPassword::new(password.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_password(&username, &password)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(GrantType::Password, meta.take(), err))?;

		Ok(map_token_response(response))
	}

	/// Performs the `refresh_token` grant.
	pub async fn exchange_refresh_token(&self, refresh_token: &Secret) -> Result<TokenPair> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let refresh_token = RefreshToken::new(refresh_token.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_token)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(GrantType::RefreshToken, meta.take(), err))?;

		Ok(map_token_response(response))
	}
}

fn map_token_response(response: TokenEndpointResponse) -> TokenPair {
	TokenPair::new(
		response.access_token().secret().to_owned(),
		response.refresh_token().map(|token| token.secret().to_owned()),
	)
}

fn map_request_error(
	grant: GrantType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(grant, response, status),
		RequestTokenError::Request(error) => map_transport_error(error),
		// A body without `access_token` lands here.
		RequestTokenError::Parse(source, _body) =>
			MalformedResponseError::Json { source, status }.into(),
		RequestTokenError::Other(message) =>
			MalformedResponseError::UnexpectedResponse { message, status }.into(),
	}
}

fn map_server_response_error(
	grant: GrantType,
	response: BasicErrorResponse,
	status: Option<u16>,
) -> Error {
	let reason = match response.error_description() {
		Some(description) =>
			format!("{} grant failed with {}: {description}", grant, response.error().as_ref()),
		None => format!("{} grant failed with {}", grant, response.error().as_ref()),
	};

	Error::InvalidGrant { reason, status }
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) =>
			if inner.is_builder() {
				ConfigError::http_client_build(*inner).into()
			} else {
				TransportError::from(*inner).into()
			},
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Io(std::io::Error::other(message)).into(),
		_ => TransportError::Io(std::io::Error::other("unknown HTTP client failure")).into(),
	}
}
