//! Tracking session.
//!
//! - `context` - session identity and timestamps for logging
//! - `tracker` - wires storage, transport and trackers into one session

pub mod context;
pub mod tracker;

pub use context::*;
pub use tracker::*;
