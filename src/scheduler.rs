//! Single-threaded scheduling primitives
//!
//! The movement engine never owns a framework timer. Instead it holds a
//! [`RecurringTimer`] and the owning event loop asks it when to wake up and
//! polls it when that moment arrives. This keeps the engine portable across
//! `tao`, a plain sleep loop, or a test that advances a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can hand one clone to the engine
/// and keep another to advance.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
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

/// Recurring task primitive with start/cancel semantics
#[derive(Debug, Clone, Default)]
pub struct RecurringTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl RecurringTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer; the first firing is one period from `now`
    pub fn start(&mut self, now: Instant, period: Duration) {
        self.period = period;
        self.deadline = Some(now + period);
    }

    /// Disarm the timer. No firing survives a cancel.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change the period of an armed (or idle) timer
    ///
    /// The pending firing moves to `min(pending, now + period)`, so it is never
    /// later than `max(remaining, period)` from now. Later firings use the
    /// new spacing.
    pub fn reschedule(&mut self, now: Instant, period: Duration) {
        self.period = period;
        if let Some(pending) = self.deadline {
            self.deadline = Some(pending.min(now + period));
        }
    }

    /// Fire at most once if the deadline has passed, then re-arm
    ///
    /// A loop that overslept by more than a period is re-anchored on `now`
    /// rather than replaying the missed firings in a burst.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let next = deadline + self.period;
                self.deadline = Some(if next > now { next } else { now + self.period });
                true
            }
            _ => false,
        }
    }

    /// Time left until the next firing (zero when overdue)
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
