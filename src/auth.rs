//! Auth-domain values relayed between clients and the identity provider.

pub mod secret;
pub mod token;
pub mod user;

pub use secret::*;
pub use token::*;
pub use user::*;
