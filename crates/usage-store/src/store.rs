//! SQLite-backed command usage counters.

use crate::error::UsageError;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Durable per-command usage counter store.
///
/// One row per distinct command name; counts only ever grow. The single
/// upsert statement is atomic at the SQLite boundary, so interleaved
/// callers never lose an update. The connection lock is held only for the
/// duration of one statement.
#[derive(Clone)]
pub struct UsageStore {
    conn: Arc<Mutex<Connection>>,
}

impl UsageStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UsageError> {
        let conn = Connection::open(path.as_ref())?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS command_stats (
                 command     TEXT PRIMARY KEY,
                 usage_count INTEGER DEFAULT 0
             );",
        )?;

        info!("Usage store opened at {:?}", path.as_ref());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self, UsageError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS command_stats (
                 command     TEXT PRIMARY KEY,
                 usage_count INTEGER DEFAULT 0
             );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Record one invocation of `command`.
    ///
    /// Inserts the row with a count of 1 on first use, otherwise bumps the
    /// existing count. Callers must pass a validated, non-empty command
    /// name.
    pub async fn increment(&self, command: &str) -> Result<(), UsageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO command_stats (command, usage_count)
             VALUES (?1, 1)
             ON CONFLICT(command) DO UPDATE SET usage_count = usage_count + 1",
            params![command],
        )?;
        debug!("Incremented usage for {}", command);
        Ok(())
    }

    /// All usage records, most-used first. Tie order is unspecified.
    pub async fn list_all(&self) -> Result<Vec<(String, i64)>, UsageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT command, usage_count FROM command_stats ORDER BY usage_count DESC",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, i64)>, _>>()?;

        Ok(rows)
    }
}
