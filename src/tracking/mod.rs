//! Tracking module.
//!
//! - `emitter` - validate, consent-gate and forward analytics events
//! - `dedup` - session-scoped registry of entities that already emitted a view
//! - `navigation` - one page view per distinct navigation
//! - `article_view` - delayed, deduplicated article views bound to a mount
//! - `search` - full-search dedup per search session, quick-search clicks
//! - `ads` - impression observers and ad clicks
//! - `funnel` - subscription funnel steps

pub mod ads;
pub mod article_view;
pub mod dedup;
pub mod emitter;
pub mod funnel;
pub mod navigation;
pub mod search;

pub use ads::*;
pub use article_view::*;
pub use dedup::*;
pub use emitter::*;
pub use funnel::*;
pub use navigation::*;
pub use search::*;
