//! User representations: what the provider returns, what the gateway projects, and what it
//! submits when creating an account.

// self
use crate::{_prelude::*, auth::Secret};

/// Custom attribute holding the phone number supplied at registration.
pub const PHONE_NUMBER_ATTRIBUTE: &str = "phone_number";

/// User as returned by the provider's admin query endpoint.
///
/// Only the fields the gateway projects are decoded; everything else is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	/// Provider-assigned identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Email address, when set.
	pub email: Option<String>,
	/// Given name, when set.
	pub first_name: Option<String>,
	/// Family name, when set.
	pub last_name: Option<String>,
}

/// Identity projection returned to gateway clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
	/// Provider-assigned identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Email address.
	pub email: Option<String>,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
}
impl From<UserRecord> for UserView {
	fn from(record: UserRecord) -> Self {
		Self {
			id: record.id,
			username: record.username,
			email: record.email,
			first_name: record.first_name,
			last_name: record.last_name,
		}
	}
}

/// Account creation payload for the provider's admin API.
///
/// The email doubles as the username, and the password is registered as a permanent
/// credential so the user can log in immediately.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser<'a> {
	enabled: bool,
	username: &'a str,
	email: &'a str,
	first_name: &'a str,
	last_name: &'a str,
	attributes: BTreeMap<&'static str, [&'a str; 1]>,
	credentials: [PasswordCredential<'a>; 1],
}
impl<'a> NewUser<'a> {
	/// Builds an enabled account whose username is `email`.
	pub fn new(
		email: &'a str,
		first_name: &'a str,
		last_name: &'a str,
		phone_number: &'a str,
		password: &'a Secret,
	) -> Self {
		Self {
			enabled: true,
			username: email,
			email,
			first_name,
			last_name,
			attributes: BTreeMap::from([(PHONE_NUMBER_ATTRIBUTE, [phone_number])]),
			credentials: [PasswordCredential {
				kind: "password",
				value: password.expose(),
				temporary: false,
			}],
		}
	}
}

#[derive(Serialize)]
struct PasswordCredential<'a> {
	#[serde(rename = "type")]
	kind: &'static str,
	value: &'a str,
	temporary: bool,
}
impl Debug for PasswordCredential<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordCredential")
			.field("kind", &self.kind)
			.field("value", &"<redacted>")
			.field("temporary", &self.temporary)
			.finish()
	}
}
