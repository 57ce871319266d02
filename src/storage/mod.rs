//! Storage module.
//!
//! Persisted key-value storage (the browser's local storage or an
//! equivalent) and the parse-and-validate step for JSON blobs kept in it.

pub mod blob;
pub mod kv;

pub use blob::*;
pub use kv::*;

/// "true" once the user has made any consent choice.
pub const CONSENT_GIVEN_KEY: &str = "consent-given";
/// JSON-encoded [`ConsentPreferences`](crate::consent::ConsentPreferences).
pub const CONSENT_PREFERENCES_KEY: &str = "consent-preferences";
/// RFC 3339 timestamp of the last consent save.
pub const CONSENT_DATE_KEY: &str = "consent-date";
/// JSON `{email, isLoggedIn}` for the logged-in demo user.
pub const USER_KEY: &str = "demo-user";
