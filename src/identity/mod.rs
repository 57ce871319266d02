//! User identity shared between persisted storage and the tracker session.

pub mod propagator;

pub use propagator::*;
