//! Thin HTTP gateway in front of an OpenID Connect identity provider.
//!
//! The gateway exposes `/register`, `/login`, and `/refresh`. Each endpoint relays to the
//! provider's admin and token APIs and answers with one uniform JSON envelope. The server is
//! assembled from [`config::GatewayConfig`], [`gateway::Gateway`], and [`api::router`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod idp;
pub mod oauth;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Secret,
		config::{GatewayConfig, GatewayConfigBuilder},
		gateway::Gateway,
	};

	/// Realm used for end-user tokens and the admin API in tests.
	pub const TEST_REALM: &str = "demo";
	/// Realm hosting the service account in tests.
	pub const TEST_ADMIN_REALM: &str = "master";
	/// Public client used for end-user grants in tests.
	pub const TEST_MOBILE_CLIENT: &str = "mobile-app";
	/// Client used for the admin password grant in tests.
	pub const TEST_ADMIN_CLIENT: &str = "admin-cli";
	/// Service account username in tests.
	pub const TEST_ADMIN_USERNAME: &str = "gateway-admin";
	/// Service account password in tests.
	pub const TEST_ADMIN_PASSWORD: &str = "gateway-admin-secret";

	/// Path of the end-user token endpoint for [`TEST_REALM`].
	pub fn user_token_path() -> String {
		format!("/realms/{TEST_REALM}/protocol/openid-connect/token")
	}

	/// Path of the admin token endpoint for [`TEST_ADMIN_REALM`].
	pub fn admin_token_path() -> String {
		format!("/realms/{TEST_ADMIN_REALM}/protocol/openid-connect/token")
	}

	/// Path of the admin users endpoint for [`TEST_REALM`].
	pub fn users_path() -> String {
		format!("/admin/realms/{TEST_REALM}/users")
	}

	/// Returns a builder pre-populated with the test realm, clients, and service account.
	pub fn test_config_builder(idp_base_url: &str) -> GatewayConfigBuilder {
		let idp_url = Url::parse(idp_base_url).expect("Test IdP base URL should parse.");

		GatewayConfig::builder(idp_url)
			.realm(TEST_REALM)
			.admin_realm(TEST_ADMIN_REALM)
			.admin_credentials(TEST_ADMIN_USERNAME, Secret::new(TEST_ADMIN_PASSWORD))
			.admin_client_id(TEST_ADMIN_CLIENT)
			.mobile_client_id(TEST_MOBILE_CLIENT)
	}

	/// Builds a [`GatewayConfig`] pointing at the provided mock IdP.
	pub fn test_config(idp_base_url: &str) -> GatewayConfig {
		test_config_builder(idp_base_url).build().expect("Test gateway config should build.")
	}

	/// Builds a [`Gateway`] pointing at the provided mock IdP.
	pub fn build_test_gateway(idp_base_url: &str) -> Gateway {
		Gateway::new(&test_config(idp_base_url)).expect("Test gateway should build.")
	}

	/// Standard successful token endpoint body.
	pub fn token_body(access: &str, refresh: &str) -> String {
		serde_json::json!({
			"access_token": access,
			"refresh_token": refresh,
			"token_type": "Bearer",
			"expires_in": 300,
		})
		.to_string()
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// The binary owns error reporting.
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
