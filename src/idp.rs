//! Identity provider clients: endpoint layout, admin user API, and service-account credentials.
//!
//! `endpoints` derives every URL the gateway calls from the configured base URL and realms.
//! `admin` wraps the two admin API calls the flows need (create a user, query users by email).
//! `credentials` defines [`AdminCredentialProvider`], the capability flows use to obtain a
//! bearer token for the admin API.

pub mod admin;
pub mod credentials;
pub mod endpoints;

pub use admin::*;
pub use credentials::*;
pub use endpoints::*;
