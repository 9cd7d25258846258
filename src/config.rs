use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Lower bound (inclusive) of the randomized pre-trigger delay.
    pub min_delay_ms: u64,
    /// Upper bound (exclusive) of the randomized pre-trigger delay.
    pub max_delay_ms: u64,
    /// How long the error screen holds before the automatic reset.
    pub error_reset_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            error_reset_ms: 3000,
        }
    }
}

impl Config {
    /// Clamp nonsense bounds back to something usable rather than failing.
    pub fn sanitized(mut self) -> Self {
        if self.min_delay_ms == 0 {
            self.min_delay_ms = Config::default().min_delay_ms;
        }
        if self.max_delay_ms <= self.min_delay_ms {
            self.max_delay_ms = self.min_delay_ms + 1;
        }
        if self.error_reset_ms == 0 {
            self.error_reset_ms = Config::default().error_reset_ms;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "reflex") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("reflex_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.sanitized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            min_delay_ms: 500,
            max_delay_ms: 5000,
            error_reset_ms: 2000,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn sanitize_repairs_inverted_bounds() {
        let cfg = Config {
            min_delay_ms: 2000,
            max_delay_ms: 1000,
            error_reset_ms: 0,
        }
        .sanitized();
        assert!(cfg.max_delay_ms > cfg.min_delay_ms);
        assert_eq!(cfg.error_reset_ms, 3000);
    }
}
