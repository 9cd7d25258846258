use crate::clock::{time_diff_ms, Clock};
use crate::config::Config;
use crate::evaluator;
use crate::history::HistoryDb;
use crate::scheduler::{TimerKind, TimerQueue};
use crate::score::ScoreStore;
use crate::session::{GameState, Session};
use rand::Rng;
use std::time::Duration;

/// Orchestrates a measurement session: owns the session state, the timer
/// queue, and the persistence collaborators, and applies the transition
/// guards. The UI never mutates state directly; it issues `start`, `reset`
/// and `surface_clicked` and renders whatever state the machine enters.
///
/// Every command returns the state that was entered (`None` when the event
/// was a guarded no-op), which is the state-change notification the caller
/// redraws on.
pub struct SessionStateMachine<C: Clock, S: ScoreStore> {
    clock: C,
    scores: S,
    timers: TimerQueue,
    session: Session,
    history: Option<HistoryDb>,
    config: Config,
    verdict: Option<String>,
    new_record: bool,
}

impl<C: Clock, S: ScoreStore> SessionStateMachine<C, S> {
    pub fn new(clock: C, scores: S, history: Option<HistoryDb>, config: Config) -> Self {
        Self {
            clock,
            scores,
            timers: TimerQueue::new(),
            session: Session::new(),
            history,
            config: config.sanitized(),
            verdict: None,
            new_record: false,
        }
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Verdict text for the current result, if any.
    pub fn verdict(&self) -> Option<&str> {
        self.verdict.as_deref()
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn best_ms(&self) -> Option<u64> {
        self.scores.get()
    }

    pub fn history(&self) -> Option<&HistoryDb> {
        self.history.as_ref()
    }

    /// Begin a session: fresh state, randomized trigger delay.
    pub fn start(&mut self) -> Option<GameState> {
        if self.session.state != GameState::Start {
            return None;
        }

        self.clear_pending();
        self.session = Session::new();
        self.verdict = None;
        self.new_record = false;

        let delay_ms =
            rand::thread_rng().gen_range(self.config.min_delay_ms..self.config.max_delay_ms);
        let handle = self.timers.schedule(
            self.clock.now(),
            Duration::from_millis(delay_ms),
            TimerKind::Trigger,
        );
        self.session.pending_handle = Some(handle);
        self.session.state = GameState::Waiting;
        Some(GameState::Waiting)
    }

    /// Return to the start screen from any state, canceling whichever timer
    /// is still pending (the trigger while Waiting, the auto-reset while in
    /// Error).
    pub fn reset(&mut self) -> Option<GameState> {
        if self.session.state == GameState::Start {
            return None;
        }
        self.clear_pending();
        self.session = Session::new();
        self.verdict = None;
        self.new_record = false;
        Some(GameState::Start)
    }

    /// A non-control activation of the surface: premature while Waiting,
    /// the measured response while Ready, ignored elsewhere.
    pub fn surface_clicked(&mut self) -> Option<GameState> {
        match self.session.state {
            GameState::Waiting => {
                // The click won the race against the trigger timer; cancel
                // it so the superseded callback never fires.
                self.clear_pending();
                if let Some(ref db) = self.history {
                    let _ = db.record_false_start();
                }
                Some(self.enter_error())
            }
            GameState::Ready => self.finish_measurement(),
            _ => None,
        }
    }

    /// Drain due timers and apply their guarded transitions. Called from
    /// the event loop on every tick.
    pub fn on_tick(&mut self) -> Option<GameState> {
        let now = self.clock.now();
        let mut entered = None;
        for timer in self.timers.poll(now) {
            match timer.kind {
                TimerKind::Trigger => {
                    // A click may have won the race and moved us to Error
                    // before this fired; in that case it is a no-op.
                    if self.session.state == GameState::Waiting {
                        self.session.pending_handle = None;
                        self.session.ready_entered_at = Some(now);
                        self.session.state = GameState::Ready;
                        entered = Some(GameState::Ready);
                    }
                }
                TimerKind::AutoReset => {
                    if self.session.state == GameState::Error {
                        self.session = Session::new();
                        entered = Some(GameState::Start);
                    }
                }
            }
        }
        entered
    }

    fn finish_measurement(&mut self) -> Option<GameState> {
        let Some(entered_at) = self.session.ready_entered_at else {
            // Internal-consistency fault: drop the transition, keep state.
            tracing::warn!("ready state without an entry timestamp; ignoring response");
            return None;
        };

        let reaction_ms = time_diff_ms(entered_at, self.clock.now());
        self.session.reaction_time_ms = Some(reaction_ms);

        // Record policy: write only when the time strictly beats the stored
        // best (or none is stored). A failing store reads as no best score,
        // so the result still displays.
        let is_record = self.scores.get().map_or(true, |best| reaction_ms < best);
        if is_record {
            if let Err(e) = self.scores.set(reaction_ms) {
                tracing::warn!("failed to persist best score: {e}");
            }
        }
        if let Some(ref db) = self.history {
            let _ = db.record_result(reaction_ms);
        }

        self.new_record = is_record;
        self.verdict = Some(evaluator::evaluate(reaction_ms, is_record));
        self.session.state = GameState::Result;
        Some(GameState::Result)
    }

    fn enter_error(&mut self) -> GameState {
        let handle = self.timers.schedule(
            self.clock.now(),
            Duration::from_millis(self.config.error_reset_ms),
            TimerKind::AutoReset,
        );
        self.session.pending_handle = Some(handle);
        self.session.ready_entered_at = None;
        self.session.state = GameState::Error;
        GameState::Error
    }

    fn clear_pending(&mut self) {
        if let Some(handle) = self.session.pending_handle.take() {
            self.timers.cancel(handle);
        }
    }
}
