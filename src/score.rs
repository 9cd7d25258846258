use crate::app_dirs::AppDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted best-score slot.
///
/// The store is dumb on purpose: `set` always overwrites. The record policy
/// (only write when the new time beats the stored one) belongs to the
/// session state machine.
pub trait ScoreStore {
    fn get(&self) -> Option<u64>;
    fn set(&mut self, ms: u64) -> io::Result<()>;
}

/// Best score as decimal text in a single file under the state directory.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::best_score_path().unwrap_or_else(|| PathBuf::from("reflex_best_ms"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self) -> Option<u64> {
        // Missing or unparseable content both read as "no best score yet"
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
    }

    fn set(&mut self, ms: u64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, ms.to_string())
    }
}

/// In-memory store for unit tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    best: Option<u64>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(ms: u64) -> Self {
        Self { best: Some(ms) }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self) -> Option<u64> {
        self.best
    }

    fn set(&mut self, ms: u64) -> io::Result<()> {
        self.best = Some(ms);
        Ok(())
    }
}
