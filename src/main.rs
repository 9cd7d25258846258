mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use reflex::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    history::HistoryDb,
    machine::SessionStateMachine,
    runtime::{EventPump, LoopEvent, TerminalInput},
    score::{FileScoreStore, ScoreStore},
    session::GameState,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 50;

/// minimal reaction time trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Wait for the green signal, hit space as fast as you can. Tracks your best time and attempt history across runs."
)]
pub struct Cli {
    /// minimum pre-signal delay in milliseconds
    #[clap(long)]
    min_delay_ms: Option<u64>,

    /// maximum pre-signal delay in milliseconds (exclusive)
    #[clap(long)]
    max_delay_ms: Option<u64>,

    /// print the persisted best time and exit
    #[clap(long)]
    best: bool,
}

impl Cli {
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(min) = self.min_delay_ms {
            cfg.min_delay_ms = min;
        }
        if let Some(max) = self.max_delay_ms {
            cfg.max_delay_ms = max;
        }
        cfg.sanitized()
    }
}

type Machine = SessionStateMachine<SystemClock, FileScoreStore>;

pub struct App {
    pub machine: Machine,
    pub pending_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            machine: SessionStateMachine::new(
                SystemClock,
                FileScoreStore::new(),
                HistoryDb::new().ok(),
                config,
            ),
            pending_quit: false,
        }
    }
}

// The TUI owns the screen, so diagnostics go to a log file instead of
// stderr. Opt in with RUST_LOG.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = fs::File::create(&path) {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    if cli.best {
        match FileScoreStore::new().get() {
            Some(ms) => println!("{} ms", ms),
            None => println!("no best score recorded"),
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.apply_to(FileConfigStore::new().load());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let pump = EventPump::new(TerminalInput::new(), Duration::from_millis(TICK_RATE_MS));

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match pump.next_turn() {
            LoopEvent::TimerPoll => {
                // Timers (the trigger and the error auto-reset) fire here
                if app.machine.on_tick().is_some() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            LoopEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            LoopEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}

/// Translate key events into session commands. This is the UI port: the
/// start and reset controls are dedicated keys and are never forwarded to
/// the machine as surface activations. Returns true to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.pending_quit {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
            _ => {
                app.pending_quit = false;
                return false;
            }
        }
    }

    let is_ctrl_c =
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

    if is_ctrl_c || matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        // Mid-measurement quits need a confirmation first
        if matches!(app.machine.state(), GameState::Waiting | GameState::Ready) {
            app.pending_quit = true;
            return false;
        }
        return true;
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Enter => {
            app.machine.start();
        }
        KeyCode::Char('r') => {
            app.machine.reset();
        }
        KeyCode::Char(' ') => {
            app.machine.surface_clicked();
        }
        _ => {}
    }
    false
}
