use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// Source of timestamps for the session core.
///
/// Wall-clock deltas are good enough for millisecond reaction times; what
/// matters is that every transition reads the same clock.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Hand-advanced clock for deterministic tests. Clones share the same
/// instant, so a test can keep one handle and advance the machine's copy.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Rc<Cell<SystemTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            instant: Rc::new(Cell::new(SystemTime::UNIX_EPOCH)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.instant.set(self.instant.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.instant.get()
    }
}

/// Milliseconds from `earlier` to `later`, saturating to zero if the clock
/// moved backwards between the two reads.
pub fn time_diff_ms(earlier: SystemTime, later: SystemTime) -> u64 {
    later
        .duration_since(earlier)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
