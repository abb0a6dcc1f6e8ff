//! Trailing-edge debounce with an injectable clock.
//!
//! The engine never sleeps or spawns timers. The [`Debouncer`] only records a
//! deadline; the host asks for it through
//! [`crate::LinkCoordinator::next_deadline`] and calls
//! [`crate::LinkCoordinator::poll`] once it has passed.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Collapses bursts of triggers into one firing after a quiet window.
///
/// Every trigger pushes the deadline to `now + quiet_window`; the debouncer
/// fires once the deadline has passed with no further triggers.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_window: Duration,
    deadline: Option<Instant>,
    coalesced: usize,
}

impl Debouncer {
    /// Debouncer with the given quiet window.
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            deadline: None,
            coalesced: 0,
        }
    }

    /// Quiet window.
    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Record a trigger at `now`, restarting the quiet window.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_window);
        self.coalesced += 1;
    }

    /// Fire if the deadline has passed.
    ///
    /// Returns the number of triggers collapsed into this firing and resets
    /// the debouncer; `None` while idle or still inside the quiet window.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(std::mem::take(&mut self.coalesced))
            }
            _ => None,
        }
    }

    /// Pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a firing is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.coalesced = 0;
    }
}
