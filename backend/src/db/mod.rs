//! # Datastore
//!
//! One SQLite connection shared by every handler behind a mutex. The schema is
//! created on open, and foreign keys are switched on so that deleting a plan
//! table takes its rows with it.

pub mod rows;

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::info;
use rusqlite::{Connection, params};

use crate::error::ApiError;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;
CREATE TABLE IF NOT EXISTS tables (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS rows (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    table_id INTEGER NOT NULL REFERENCES tables(id) ON DELETE CASCADE,
    forest   TEXT NOT NULL DEFAULT '',
    buyer    TEXT NOT NULL DEFAULT '',
    product  TEXT NOT NULL DEFAULT '',
    species  TEXT NOT NULL DEFAULT '',
    volume   REAL NOT NULL DEFAULT 0,
    amount   REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS rows_table_id ON rows(table_id);
CREATE TABLE IF NOT EXISTS forests (name TEXT PRIMARY KEY);
CREATE TABLE IF NOT EXISTS products (name TEXT PRIMARY KEY);
CREATE TABLE IF NOT EXISTS species (name TEXT PRIMARY KEY);
CREATE TABLE IF NOT EXISTS purchases (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    buyer   TEXT NOT NULL,
    product TEXT NOT NULL,
    species TEXT NOT NULL,
    volume  REAL NOT NULL DEFAULT 0,
    amount  REAL NOT NULL DEFAULT 0,
    UNIQUE (buyer, product, species)
);
";

/// Shared handle registered as `web::Data<DbState>`.
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        let path = path.as_ref();
        info!("Opening datastore at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::Internal("datastore lock poisoned".to_string()))?;
        f(&conn)
    }
}

/// `true` when a row with this id exists in `tables`.
pub fn table_exists(conn: &Connection, table_id: i64) -> Result<bool, ApiError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tables WHERE id = ?1)",
        params![table_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_survives_reopening_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans.sqlite");

        let db = DbState::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
            Ok(())
        })
        .unwrap();
        drop(db);

        let reopened = DbState::open(&path).unwrap();
        let count: i64 = reopened
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM tables", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn deleting_a_table_cascades_to_its_rows() {
        let db = DbState::open_in_memory().unwrap();
        let remaining: i64 = db
            .with_conn(|conn| {
                conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
                let table_id = conn.last_insert_rowid();
                conn.execute("INSERT INTO rows (table_id, forest) VALUES (?1, 'North')", params![table_id])?;
                conn.execute("DELETE FROM tables WHERE id = ?1", params![table_id])?;
                Ok(conn.query_row("SELECT COUNT(*) FROM rows", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn duplicate_dates_map_to_conflict() {
        let db = DbState::open_in_memory().unwrap();
        let result = db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
            Ok(())
        });
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }
}
