//! Structured logging with session context.
//!
//! Every log line carries the tracking session id and, where relevant, the
//! component (navigation, media, funnel, ...) that produced it.

pub mod structured;

pub use structured::*;
