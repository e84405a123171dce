// SQLite-backed local store for the persisted draft plan.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Key-value store holding serialized plans. Each value is a JSON document
/// stored under a caller-chosen key.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the table
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS selection_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn save_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO selection_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load the value stored under `key`. Returns `None` if the key does not
    /// exist.
    pub fn load_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM selection_state WHERE key = ?1")
            .context("failed to prepare load_value query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query selection state")?;

        match rows.next() {
            Some(row_result) => Ok(Some(row_result.context("failed to read state row")?)),
            None => Ok(None),
        }
    }

    /// Remove the value stored under `key`. Removing a missing key is a no-op.
    pub fn delete_value(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM selection_state WHERE key = ?1",
            params![key],
        )
        .context("failed to delete state")?;
        Ok(())
    }

    /// Timestamp of the last write to `key`, as stored by SQLite.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT updated_at FROM selection_state WHERE key = ?1")
            .context("failed to prepare updated_at query")?;
        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query updated_at")?;
        match rows.next() {
            Some(row_result) => Ok(Some(row_result.context("failed to read updated_at")?)),
            None => Ok(None),
        }
    }
}
