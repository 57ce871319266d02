//! Consent module.
//!
//! - `preferences` - consent categories and the persisted record shape
//! - `store` - fail-closed persistence of the user's choice
//! - `manager` - consent banner actions and their enhanced-consent events

pub mod manager;
pub mod preferences;
pub mod store;

pub use manager::*;
pub use preferences::*;
pub use store::*;
