//! Analytics event model.
//!
//! - `entities` - context entities attached to events (article, ad, A/B test)
//! - `types` - the `AnalyticsEvent` union and the envelope sent to a transport
//! - `validation` - required-field checks run before emission

pub mod entities;
pub mod types;
pub mod validation;

pub use entities::*;
pub use types::*;
pub use validation::*;
