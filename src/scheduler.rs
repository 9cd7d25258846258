use std::time::{Duration, SystemTime};

/// What a timer does when it fires. The state machine dispatches on this
/// after polling, so timers stay plain data instead of boxed closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Ends the waiting period and arms the response window.
    Trigger,
    /// Returns the machine from the error state to the start screen.
    AutoReset,
}

/// Opaque handle returned by `schedule`, used only for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub due: SystemTime,
}

/// Cooperative single-threaded timer queue.
///
/// The event loop polls it on every tick; nothing fires between polls, which
/// is what makes the waiting-vs-click race deterministic and testable with a
/// manual clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: SystemTime, delay: Duration, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            handle,
            kind,
            due: now + delay,
        });
        handle
    }

    /// Removes a not-yet-fired entry. Canceling a handle that already fired
    /// or was already canceled is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }

    /// Pops every entry whose due time has passed, in due order.
    pub fn poll(&mut self, now: SystemTime) -> Vec<Timer> {
        let mut due: Vec<Timer> = self
            .pending
            .iter()
            .copied()
            .filter(|t| t.due <= now)
            .collect();
        self.pending.retain(|t| t.due > now);
        due.sort_by_key(|t| t.due);
        due
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(ms)
    }

    #[test]
    fn fires_only_once_due() {
        let mut q = TimerQueue::new();
        q.schedule(at(0), Duration::from_millis(100), TimerKind::Trigger);

        assert!(q.poll(at(99)).is_empty());
        let fired = q.poll(at(100));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TimerKind::Trigger);
        // Entry is consumed by the poll that returned it
        assert!(q.poll(at(200)).is_empty());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut q = TimerQueue::new();
        let h = q.schedule(at(0), Duration::from_millis(50), TimerKind::Trigger);
        q.cancel(h);
        assert!(q.poll(at(1000)).is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let h = q.schedule(at(0), Duration::from_millis(50), TimerKind::AutoReset);
        q.cancel(h);
        q.cancel(h);
        assert_eq!(q.pending_len(), 0);

        // Canceling an already-fired handle is equally harmless
        let h2 = q.schedule(at(0), Duration::from_millis(10), TimerKind::Trigger);
        assert_eq!(q.poll(at(10)).len(), 1);
        q.cancel(h2);
    }

    #[test]
    fn handles_are_unique() {
        let mut q = TimerQueue::new();
        let a = q.schedule(at(0), Duration::from_millis(1), TimerKind::Trigger);
        let b = q.schedule(at(0), Duration::from_millis(1), TimerKind::Trigger);
        assert_ne!(a, b);
    }

    #[test]
    fn poll_returns_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(0), Duration::from_millis(300), TimerKind::AutoReset);
        q.schedule(at(0), Duration::from_millis(100), TimerKind::Trigger);

        let fired = q.poll(at(1000));
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].kind, TimerKind::Trigger);
        assert_eq!(fired[1].kind, TimerKind::AutoReset);
    }
}
