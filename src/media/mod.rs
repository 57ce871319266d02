//! Media playback telemetry.
//!
//! - `state` - per-player playback state and the seek state machine
//! - `adapter` - maps media element events to media analytics events

pub mod adapter;
pub mod state;

pub use adapter::*;
pub use state::*;
