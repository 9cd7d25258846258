use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// One turn of the app loop.
#[derive(Clone, Debug)]
pub enum LoopEvent {
    Key(KeyEvent),
    Resize,
    /// No input arrived within the poll interval. The session machine polls
    /// its timer queue on these turns, so the interval bounds how late the
    /// trigger and the error auto-reset can fire.
    TimerPoll,
}

/// Where loop events come from. Production reads the terminal; headless
/// tests feed a scripted channel.
pub trait InputSource {
    /// Wait up to `timeout` for the next event; `None` on silence.
    fn next_event(&self, timeout: Duration) -> Option<LoopEvent>;
}

/// Terminal input, pumped by a crossterm read loop on its own thread.
pub struct TerminalInput {
    rx: Receiver<LoopEvent>,
}

impl TerminalInput {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) => LoopEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => LoopEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for TerminalInput {
    fn next_event(&self, timeout: Duration) -> Option<LoopEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Channel-fed input for tests that drive the loop without a TTY.
pub struct ScriptedInput {
    rx: Receiver<LoopEvent>,
}

impl ScriptedInput {
    pub fn new(rx: Receiver<LoopEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&self, timeout: Duration) -> Option<LoopEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Paces the app loop: waits on the input source and turns silence into
/// timer-poll turns at a fixed cadence, so the machine's timers keep firing
/// while the user does nothing.
pub struct EventPump<I: InputSource> {
    input: I,
    poll_interval: Duration,
}

impl<I: InputSource> EventPump<I> {
    pub fn new(input: I, poll_interval: Duration) -> Self {
        Self {
            input,
            poll_interval,
        }
    }

    /// Blocks up to the poll interval and returns the next turn.
    pub fn next_turn(&self) -> LoopEvent {
        self.input
            .next_event(self.poll_interval)
            .unwrap_or(LoopEvent::TimerPoll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::machine::SessionStateMachine;
    use crate::score::MemoryScoreStore;
    use crate::session::GameState;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn silence_becomes_a_timer_poll_turn() {
        let (_tx, rx) = mpsc::channel();
        let pump = EventPump::new(ScriptedInput::new(rx), Duration::from_millis(1));

        assert!(matches!(pump.next_turn(), LoopEvent::TimerPoll));
    }

    #[test]
    fn scripted_events_come_out_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoopEvent::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        )))
        .unwrap();
        tx.send(LoopEvent::Resize).unwrap();
        let pump = EventPump::new(ScriptedInput::new(rx), Duration::from_millis(10));

        assert!(matches!(pump.next_turn(), LoopEvent::Key(_)));
        assert!(matches!(pump.next_turn(), LoopEvent::Resize));
        // Channel drained: back to timer polls
        assert!(matches!(pump.next_turn(), LoopEvent::TimerPoll));
    }

    #[test]
    fn timer_poll_turns_fire_a_pending_trigger() {
        let clock = ManualClock::new();
        let mut machine = SessionStateMachine::new(
            clock.clone(),
            MemoryScoreStore::new(),
            None,
            Config {
                min_delay_ms: 1000,
                max_delay_ms: 1001,
                error_reset_ms: 3000,
            },
        );
        machine.start();

        let interval = Duration::from_millis(50);
        let (_tx, rx) = mpsc::channel();
        let pump = EventPump::new(ScriptedInput::new(rx), interval);

        // With no input, each turn is a timer poll; the trigger fires once
        // enough polls have passed its due time.
        for _ in 0..30u32 {
            match pump.next_turn() {
                LoopEvent::TimerPoll => {
                    clock.advance(interval);
                    machine.on_tick();
                }
                _ => panic!("no input was scripted"),
            }
            if machine.state() == GameState::Ready {
                break;
            }
        }

        assert_eq!(machine.state(), GameState::Ready);
    }
}
