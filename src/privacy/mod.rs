//! Privacy module.
//!
//! - `redaction` - form tracking policy and free-text PII scrubbing
//! - `url` - cross-domain link decoration and `_sp` cleanup

pub mod redaction;
pub mod url;

pub use redaction::*;
pub use url::*;
