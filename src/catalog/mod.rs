//! Static site content.
//!
//! Articles and advertisements live in memory; nothing here is persisted.

pub mod ads;
pub mod articles;

pub use ads::*;
pub use articles::*;
