//! Session persistence.
//!
//! The UI holds exactly one session, serialized as a single JSON object
//! under a fixed key, mirroring the single-slot browser storage it
//! replaces.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::auth::{Session, SESSION_KEY};

impl Database {
    /// Persist the session, replacing any previous one.
    pub fn save_session(&self, session: &Session) -> DbResult<()> {
        let value = serde_json::to_string(session)?;
        self.conn.execute(
            r#"
            INSERT INTO session_state (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![SESSION_KEY, value],
        )?;
        Ok(())
    }

    /// Load the stored session, if any.
    pub fn load_session(&self) -> DbResult<Option<Session>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?",
                [SESSION_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|v| serde_json::from_str(&v).map_err(Into::into))
            .transpose()
    }

    /// Clear the stored session (logout or denied authentication).
    pub fn clear_session(&self) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM session_state WHERE key = ?", [SESSION_KEY])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_session() -> Session {
        let now = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Session {
            employee_id: "emp-1".into(),
            employee_name: "Dr. Lima".into(),
            role: crate::models::EmployeeRole::Admin,
            issued_at: now,
            expires_at: now + chrono::Duration::minutes(480),
        }
    }

    #[test]
    fn test_save_and_load() {
        let db = setup_db();

        assert!(db.load_session().unwrap().is_none());

        let session = make_session();
        db.save_session(&session).unwrap();

        let loaded = db.load_session().unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_save_replaces() {
        let db = setup_db();

        let first = make_session();
        db.save_session(&first).unwrap();

        let mut second = make_session();
        second.employee_id = "emp-2".into();
        db.save_session(&second).unwrap();

        let loaded = db.load_session().unwrap().unwrap();
        assert_eq!(loaded.employee_id, "emp-2");
    }

    #[test]
    fn test_clear() {
        let db = setup_db();

        db.save_session(&make_session()).unwrap();
        db.clear_session().unwrap();
        assert!(db.load_session().unwrap().is_none());

        // Clearing an empty store is not an error
        db.clear_session().unwrap();
    }
}
