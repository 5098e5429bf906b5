//! Cancellable timers and time sources
//!
//! Timers never sleep or spawn anything; they only answer "what fired between
//! the last poll and `now`". Time is `f64` seconds from an arbitrary origin.
//! Cancelling is always idempotent.

use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Monotonic system clock
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Browser clock (`Date.now()`)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        js_sys::Date::now() / 1000.0
    }
}

/// Hand-driven clock for tests and headless runs. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Repeating timer with a fixed interval
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: f64,
    next_due: Option<f64>,
}

impl IntervalTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// (Re)start so the first firing happens one interval after `now`
    pub fn start(&mut self, now: f64) {
        self.next_due = Some(now + self.interval);
    }

    /// Stop the timer. Safe to call when already stopped.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Collect firing instants up to and including `now`.
    ///
    /// At most `max_fires` are returned; any further backlog is dropped and
    /// the schedule is rebased onto `now`. Callers that measure elapsed time
    /// between firings see the skipped span in the next firing.
    pub fn due(&mut self, now: f64, max_fires: u32) -> Vec<f64> {
        let mut fires = Vec::new();
        let Some(mut due) = self.next_due else {
            return fires;
        };
        while due <= now {
            if fires.len() as u32 == max_fires {
                log::debug!(
                    "Timer fell behind by {:.3}s, dropping backlog",
                    now - due
                );
                due = now + self.interval;
                break;
            }
            fires.push(due);
            due += self.interval;
        }
        self.next_due = Some(due);
        fires
    }
}

/// One-shot deadline that can be frozen while paused
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    state: DeadlineState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum DeadlineState {
    #[default]
    Idle,
    Armed { at: f64 },
    Frozen { remaining: f64 },
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the deadline to fire `duration` seconds after `now`
    pub fn arm(&mut self, now: f64, duration: f64) {
        self.state = DeadlineState::Armed { at: now + duration };
    }

    /// Disarm. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.state = DeadlineState::Idle;
    }

    /// Stop the countdown, remembering how much time was left
    pub fn freeze(&mut self, now: f64) {
        if let DeadlineState::Armed { at } = self.state {
            self.state = DeadlineState::Frozen {
                remaining: (at - now).max(0.0),
            };
        }
    }

    /// Resume a frozen countdown from `now`
    pub fn thaw(&mut self, now: f64) {
        if let DeadlineState::Frozen { remaining } = self.state {
            self.state = DeadlineState::Armed { at: now + remaining };
        }
    }

    /// When the deadline fires, if armed
    pub fn at(&self) -> Option<f64> {
        match self.state {
            DeadlineState::Armed { at } => Some(at),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state != DeadlineState::Idle
    }

    /// Fire if the deadline has passed. Fires at most once per arming.
    pub fn poll(&mut self, now: f64) -> Option<f64> {
        match self.state {
            DeadlineState::Armed { at } if at <= now => {
                self.state = DeadlineState::Idle;
                Some(at)
            }
            _ => None,
        }
    }
}
