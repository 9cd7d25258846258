use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use std::path::PathBuf;

/// One recorded attempt: a measured reaction or a false start.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub reaction_ms: Option<u64>,
    pub false_start: bool,
    pub timestamp: DateTime<Local>,
}

/// Database manager for the attempt history shown on the result panel
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Initialize the database connection and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::history_db_path().unwrap_or_else(|| PathBuf::from("reflex_history.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(&db_path)?;
        Self::with_connection(conn)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reaction_ms INTEGER,
                false_start BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_timestamp ON attempts(timestamp)",
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    /// Record a completed measurement
    pub fn record_result(&self, reaction_ms: u64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO attempts (reaction_ms, false_start, timestamp) VALUES (?1, 0, ?2)",
            params![reaction_ms, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record a premature response
    pub fn record_false_start(&self) -> Result<()> {
        self.conn.execute(
            "INSERT INTO attempts (reaction_ms, false_start, timestamp) VALUES (NULL, 1, ?1)",
            params![Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Number of completed measurements (false starts excluded)
    pub fn result_count(&self) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM attempts WHERE false_start = 0",
            [],
            |row| row.get(0),
        )
    }

    pub fn false_start_count(&self) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM attempts WHERE false_start = 1",
            [],
            |row| row.get(0),
        )
    }

    /// Mean reaction time over all completed measurements
    pub fn average_ms(&self) -> Result<Option<f64>> {
        self.conn.query_row(
            "SELECT AVG(reaction_ms) FROM attempts WHERE false_start = 0",
            [],
            |row| row.get(0),
        )
    }

    /// Most recent attempts, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<Attempt>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT reaction_ms, false_start, timestamp
            FROM attempts
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let iter = stmt.query_map([limit as i64], |row| {
            let timestamp_str: String = row.get(2)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        2,
                        "timestamp".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(Attempt {
                reaction_ms: row.get::<_, Option<i64>>(0)?.map(|v| v as u64),
                false_start: row.get(1)?,
                timestamp,
            })
        })?;

        let mut attempts = Vec::new();
        for attempt in iter {
            attempts.push(attempt?);
        }
        Ok(attempts)
    }
}
