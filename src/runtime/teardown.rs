//! Unmount-time cleanup.

use super::event_target::Subscription;
use super::timer::TimerHandle;

type TeardownAction = Box<dyn FnOnce() + Send>;

/// Cleanup actions gathered while a component is mounted and run exactly
/// once when it unmounts (or is dropped).
#[derive(Default)]
pub struct Teardown {
    actions: Vec<TeardownAction>,
    done: bool,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.push(Box::new(action));
    }

    pub fn add_subscription(&mut self, subscription: Subscription) {
        self.add(move || subscription.unsubscribe());
    }

    pub fn add_timer(&mut self, timer: TimerHandle) {
        self.add(move || {
            timer.cancel();
        });
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Run every action in registration order. Later calls are no-ops.
    pub fn run(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        for action in self.actions.drain(..) {
            action();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("actions", &self.actions.len())
            .field("done", &self.done)
            .finish()
    }
}
