//! Database connection management
//!
//! Opens and configures the single SQLite connection the backend owns

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::snapshot::DumpMode;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; `None` opens a private in-memory database
    pub path: Option<PathBuf>,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout_ms: u64,
    pub dump_mode: DumpMode,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5_000,
            dump_mode: DumpMode::CollectionAtATime,
        }
    }
}

/// Open a connection per `config`, configure it and create the schema
pub fn open(config: &StoreConfig) -> Result<Connection> {
    let mut conn = match &config.path {
        Some(path) => Connection::open(path).map_err(from_rusqlite)?,
        None => Connection::open_in_memory().map_err(from_rusqlite)?,
    };
    configure(&conn, config)?;
    apply_migrations(&mut conn)?;

    tracing::debug!(
        path = ?config.path,
        busy_timeout_ms = config.busy_timeout_ms,
        "Opened store"
    );
    Ok(conn)
}

/// Open an in-memory database with the schema applied (for testing)
pub fn open_in_memory() -> Result<Connection> {
    open(&StoreConfig::in_memory())
}

/// Configure a connection
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(from_rusqlite)?;

    // WAL lets readers proceed during the movement/restore write transactions.
    // In-memory databases report "memory" and ignore the request.
    if config.path.is_some() {
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Close the connection, surfacing any error SQLite reports
pub fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, e)| from_rusqlite(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'inventory'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        close(conn).unwrap();
    }

    #[test]
    fn test_file_database_uses_wal() {
        let dir = tempfile::TempDir::new().unwrap();
        let conn = open(&StoreConfig::file(dir.path().join("ctrgt.db"))).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}
