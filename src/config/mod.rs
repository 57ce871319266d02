//! Tracker configuration.
//!
//! `tracker` holds the typed configuration with the site's defaults;
//! `env` layers `DAILYQUERY_*` environment overrides on top.

pub mod env;
pub mod tracker;

pub use env::*;
pub use tracker::*;
