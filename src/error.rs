//! Gateway-level error types shared by the IdP clients, flows, and configuration.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error raised while talking to the identity provider.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The IdP answered, but not with the shape the gateway expects.
	#[error(transparent)]
	MalformedUpstreamResponse(#[from] MalformedResponseError),

	/// Token endpoint returned an OAuth error (bad credentials, expired refresh token, ...).
	#[error("Identity provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Admin API answered with a non-2xx status.
	#[error("Identity provider responded with HTTP {status}.")]
	UpstreamStatus {
		/// HTTP status code returned by the admin API.
		status: u16,
		/// Raw response body, kept verbatim for callers that surface it.
		body: String,
	},
}
impl Error {
	/// Returns `true` when the IdP could not be reached at all (as opposed to answering badly).
	pub fn is_unreachable(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::Config(_))
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting is absent or blank.
	#[error("Required setting `{name}` is missing.")]
	MissingSetting {
		/// Setting (environment variable) name.
		name: &'static str,
	},
	/// IdP base URL cannot be parsed.
	#[error("Identity provider URL is invalid.")]
	InvalidIdpUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// IdP base URL uses a scheme other than HTTP(S) or cannot carry path segments.
	#[error("Identity provider URL must be an absolute http(s) URL: {url}.")]
	UnsupportedIdpUrl {
		/// Offending URL.
		url: String,
	},
	/// Listen address cannot be parsed.
	#[error("Listen address `{value}` is invalid.")]
	InvalidListenAddr {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: std::net::AddrParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Upstream payloads that could not be decoded into the expected shape.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// Body was not valid JSON or lacked a required field.
	#[error("Identity provider returned malformed JSON.")]
	Json {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Response could not be interpreted at all (unexpected content type, ...).
	#[error("Identity provider returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Description of what was wrong.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Decodes a JSON payload, reporting the failing path on error.
pub(crate) fn decode_json<T>(bytes: &[u8], status: Option<u16>) -> Result<T>
where
	T: serde::de::DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| MalformedResponseError::Json { source, status }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Probe {
		#[allow(dead_code)]
		id: String,
	}

	#[test]
	fn decode_json_reports_missing_field_path() {
		let err = decode_json::<Vec<Probe>>(br#"[{"id":"a"},{"name":"b"}]"#, Some(200))
			.expect_err("Second element lacks `id`.");

		match err {
			Error::MalformedUpstreamResponse(MalformedResponseError::Json { source, status }) => {
				assert_eq!(status, Some(200));
				assert!(source.path().to_string().starts_with("[1]"));
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn unreachable_covers_transport_only() {
		let io = Error::from(TransportError::Io(std::io::Error::other("reset")));
		let grant = Error::InvalidGrant { reason: "invalid_grant".into(), status: Some(401) };

		assert!(io.is_unreachable());
		assert!(!grant.is_unreachable());
	}
}
