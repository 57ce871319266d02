//! Host event-loop primitives.
//!
//! The tracking layer runs on the host's single thread of control. These
//! types model the pieces of that loop the layer depends on:
//! - `clock` - monotonic time source (system or manual)
//! - `timer` - owned, cancellable one-shot timers
//! - `event_target` - listener lists with subscribe/unsubscribe handles
//! - `teardown` - unmount-time cleanup gathered into one call

pub mod clock;
pub mod event_target;
pub mod teardown;
pub mod timer;

pub use clock::*;
pub use event_target::*;
pub use teardown::*;
pub use timer::*;
