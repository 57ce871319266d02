//! Daily Query Core - consent-gated analytics tracking
//!
//! This crate is the tracking layer of The Daily Query media site. The page
//! shell, router and components call into it; it decides what reaches the
//! analytics collector. The implementation prioritizes:
//!
//! 1. **Consent** - nothing is sent without analytics consent, and nothing
//!    suppressed is ever replayed
//! 2. **Exactly-once** - one page view per navigation, one article view per
//!    article per session
//! 3. **Logging** - every decision point logged with session context
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `consent` - consent preferences, fail-closed storage, banner actions
//! - `identity` - user id propagation between storage and the tracker
//! - `events` - the analytics event model and required-field validation
//! - `tracking` - emitter, dedup registry, navigation, article views, search, ads, funnel
//! - `media` - media element telemetry with a warm-up window
//! - `privacy` - form field redaction and cross-domain link handling
//! - `transport` - the seam to the analytics collector
//! - `session` - wiring of all of the above for one page session
//! - `runtime` - clock, cancellable timers, listener subscriptions, teardown
//! - `storage` - key-value storage backends and JSON blob handling
//! - `catalog` - static articles and advertisements
//! - `config` - tracker configuration and environment overrides
//! - `logging` - structured logging with session context

pub mod catalog;
pub mod config;
pub mod consent;
pub mod error;
pub mod events;
pub mod identity;
pub mod logging;
pub mod media;
pub mod privacy;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod tracking;
pub mod transport;

pub use config::TrackerConfig;
pub use consent::{ConsentCategory, ConsentManager, ConsentPreferences, ConsentStore};
pub use error::{ConfigError, IdentityError, StorageError, TransportError, ValidationError};
pub use events::{AnalyticsEvent, EventEnvelope, EventKind};
pub use identity::{Identity, IdentityPropagator};
pub use session::TrackingSession;
pub use tracking::{EmitOutcome, Emitter, EmitterStats};
pub use transport::Transport;

/// Initialize the process-wide logger.
///
/// Safe to call more than once; later calls are no-ops. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
