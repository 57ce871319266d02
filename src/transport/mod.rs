//! The analytics transport seam.
//!
//! The tracking layer never talks to a collector directly. Everything that
//! leaves the process goes through a [`Transport`], which may be a network
//! client, a log sink, a recorder for tests, or nothing at all.

pub mod log_sink;
pub mod recording;

pub use log_sink::*;
pub use recording::*;

use crate::config::{
    ActivityTrackingConfig, FormTrackingConfig, LinkTrackingConfig, TrackerConfig,
};
use crate::error::TransportError;
use crate::events::types::EventEnvelope;

/// Sink for tracker configuration, identity and events.
///
/// Calls arrive in emission order from a single logical thread of control.
/// Implementations report failures through `TransportError`; callers catch
/// and log them, they never retry.
pub trait Transport: Send + Sync {
    fn initialize(&self, config: &TrackerConfig) -> Result<(), TransportError>;

    /// Set or clear the user id attached to subsequent events.
    fn set_identity(&self, identity: Option<&str>) -> Result<(), TransportError>;

    fn send_event(&self, event: &EventEnvelope) -> Result<(), TransportError>;

    fn enable_auto_pings(&self, config: &ActivityTrackingConfig) -> Result<(), TransportError>;

    fn enable_link_tracking(&self, config: &LinkTrackingConfig) -> Result<(), TransportError>;

    fn enable_form_tracking(&self, config: &FormTrackingConfig) -> Result<(), TransportError>;
}
