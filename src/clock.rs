//! Host clocks driving the sequencer's tick timer.
//!
//! This is the host's notion of time (when to tick), not the device clock
//! (when a tick's sounds start).

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;
}

/// A clock that only moves when told to. Clones share the same time.
///
/// Browser hosts feed it from `performance.now()`; the offline renderer
/// steps it with the rendered frames.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
