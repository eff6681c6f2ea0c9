//! Database layer for vaxtrack.

mod schema;
mod clients;
mod employees;
mod vaccines;
mod batches;
mod appointments;
mod applications;
mod sessions;

pub use schema::*;
#[allow(unused_imports)]
pub use clients::*;
#[allow(unused_imports)]
pub use employees::*;
#[allow(unused_imports)]
pub use vaccines::*;
#[allow(unused_imports)]
pub use batches::*;
#[allow(unused_imports)]
pub use appointments::*;
#[allow(unused_imports)]
pub use applications::*;
#[allow(unused_imports)]
pub use sessions::*;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Storage format for dates.
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
/// Storage format for timestamps (lexicographic order matches time order).
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a stored date, failing loudly on malformed data.
pub(crate) fn parse_date(value: &str, column: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FMT)
        .map_err(|e| DbError::Constraint(format!("malformed date in {}: {}", column, e)))
}

/// Parse a stored timestamp, failing loudly on malformed data.
pub(crate) fn parse_datetime(value: &str, column: &str) -> DbResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FMT)
        .map_err(|e| DbError::Constraint(format!("malformed timestamp in {}: {}", column, e)))
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries, e.g. report aggregates).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"clients".to_string()));
        assert!(tables.contains(&"employees".to_string()));
        assert!(tables.contains(&"vaccines".to_string()));
        assert!(tables.contains(&"batches".to_string()));
        assert!(tables.contains(&"appointments".to_string()));
        assert!(tables.contains(&"applications".to_string()));
        assert!(tables.contains(&"session_state".to_string()));
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        {
            let db = Database::open(&path).unwrap();
            let client = crate::models::Client::new(
                "12345678900".into(),
                "Ana Souza".into(),
                chrono::NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            );
            db.insert_client(&client).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let client = db.get_client("12345678900").unwrap().unwrap();
        assert_eq!(client.name, "Ana Souza");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2025-06-15", "birth_date").is_ok());
        assert!(parse_date("15/06/2025", "birth_date").is_err());
        assert!(parse_date("", "birth_date").is_err());
    }
}
