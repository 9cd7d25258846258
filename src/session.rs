use crate::scheduler::TimerHandle;
use std::time::SystemTime;

/// The five mutually exclusive phases of a measurement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Idle; the start control is showing.
    #[default]
    Start,
    /// Randomized pre-trigger delay is running.
    Waiting,
    /// Trigger shown; the next surface activation is the measured response.
    Ready,
    /// A reaction time has been recorded and is on display.
    Result,
    /// A premature response was caught; auto-reset is pending.
    Error,
}

/// Mutable per-session state, owned exclusively by the state machine and
/// rebuilt on every start/reset.
///
/// Invariants the machine maintains:
/// - `ready_entered_at` is set iff state is Ready or Result.
/// - `pending_handle` is set only while Waiting (the trigger timer) or
///   while in Error (the auto-reset timer), and is canceled before any
///   transition that supersedes it.
/// - `reaction_time_ms` is written at most once, on Ready -> Result.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: GameState,
    pub ready_entered_at: Option<SystemTime>,
    pub reaction_time_ms: Option<u64>,
    pub pending_handle: Option<TimerHandle>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
