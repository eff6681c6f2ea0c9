//! Client database operations.

use rusqlite::{params, OptionalExtension};

use super::{parse_date, Database, DbError, DbResult, DATE_FMT};
use crate::models::Client;

impl Database {
    /// Insert a new client.
    pub fn insert_client(&self, client: &Client) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clients (
                national_id, name, birth_date, phone, email, address,
                allergy_notes, observations, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                client.national_id,
                client.name,
                client.birth_date.format(DATE_FMT).to_string(),
                client.phone,
                client.email,
                client.address,
                client.allergy_notes,
                client.observations,
                client.active,
                client.created_at,
                client.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing client.
    pub fn update_client(&self, client: &Client) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE clients SET
                name = ?2,
                birth_date = ?3,
                phone = ?4,
                email = ?5,
                address = ?6,
                allergy_notes = ?7,
                observations = ?8,
                active = ?9,
                updated_at = datetime('now')
            WHERE national_id = ?1
            "#,
            params![
                client.national_id,
                client.name,
                client.birth_date.format(DATE_FMT).to_string(),
                client.phone,
                client.email,
                client.address,
                client.allergy_notes,
                client.observations,
                client.active,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a client by national ID.
    pub fn get_client(&self, national_id: &str) -> DbResult<Option<Client>> {
        self.conn
            .query_row(
                r#"
                SELECT national_id, name, birth_date, phone, email, address,
                       allergy_notes, observations, active, created_at, updated_at
                FROM clients
                WHERE national_id = ?
                "#,
                [national_id],
                map_client_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all clients, ordered by name.
    pub fn list_clients(&self) -> DbResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT national_id, name, birth_date, phone, email, address,
                   allergy_notes, observations, active, created_at, updated_at
            FROM clients
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], map_client_row)?;
        let mut clients = Vec::new();
        for row in rows {
            clients.push(row?.try_into()?);
        }
        Ok(clients)
    }

    /// Search clients by name (prefix match).
    pub fn search_clients_by_name(&self, query: &str, limit: usize) -> DbResult<Vec<Client>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT national_id, name, birth_date, phone, email, address,
                   allergy_notes, observations, active, created_at, updated_at
            FROM clients
            WHERE name LIKE ?
            ORDER BY name
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![pattern, limit as i64], map_client_row)?;
        let mut clients = Vec::new();
        for row in rows {
            clients.push(row?.try_into()?);
        }
        Ok(clients)
    }

    /// Toggle a client's active flag.
    pub fn set_client_active(&self, national_id: &str, active: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE clients SET active = ?, updated_at = datetime('now') WHERE national_id = ?",
            params![active, national_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a client. Fails while appointments or applications reference it.
    pub fn delete_client(&self, national_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM clients WHERE national_id = ?", [national_id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct ClientRow {
    national_id: String,
    name: String,
    birth_date: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    allergy_notes: Option<String>,
    observations: Option<String>,
    active: bool,
    created_at: String,
    updated_at: String,
}

fn map_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        national_id: row.get(0)?,
        name: row.get(1)?,
        birth_date: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        address: row.get(5)?,
        allergy_notes: row.get(6)?,
        observations: row.get(7)?,
        active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<ClientRow> for Client {
    type Error = DbError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            birth_date: parse_date(&row.birth_date, "clients.birth_date")?,
            national_id: row.national_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            allergy_notes: row.allergy_notes,
            observations: row.observations,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_client(national_id: &str, name: &str) -> Client {
        Client::new(
            national_id.into(),
            name.into(),
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut client = make_client("12345678900", "Ana Souza");
        client.allergy_notes = Some("egg protein".into());
        db.insert_client(&client).unwrap();

        let retrieved = db.get_client("12345678900").unwrap().unwrap();
        assert_eq!(retrieved.name, "Ana Souza");
        assert_eq!(retrieved.allergy_notes, Some("egg protein".into()));
        assert_eq!(
            retrieved.birth_date,
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap()
        );
    }

    #[test]
    fn test_duplicate_national_id_rejected() {
        let db = setup_db();

        db.insert_client(&make_client("111", "Ana")).unwrap();
        let result = db.insert_client(&make_client("111", "Other Ana"));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_client() {
        let db = setup_db();

        let mut client = make_client("111", "Ana");
        db.insert_client(&client).unwrap();

        client.phone = Some("+55 11 91234-5678".into());
        client.observations = Some("prefers morning appointments".into());
        db.update_client(&client).unwrap();

        let retrieved = db.get_client("111").unwrap().unwrap();
        assert_eq!(retrieved.phone, Some("+55 11 91234-5678".into()));
        assert_eq!(
            retrieved.observations,
            Some("prefers morning appointments".into())
        );
    }

    #[test]
    fn test_search_by_name_prefix() {
        let db = setup_db();

        db.insert_client(&make_client("1", "Ana Souza")).unwrap();
        db.insert_client(&make_client("2", "Anabela Reis")).unwrap();
        db.insert_client(&make_client("3", "Bruno Costa")).unwrap();

        let results = db.search_clients_by_name("Ana", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|c| c.name == "Ana Souza"));
        assert!(results.iter().any(|c| c.name == "Anabela Reis"));
    }

    #[test]
    fn test_set_active() {
        let db = setup_db();

        db.insert_client(&make_client("1", "Ana")).unwrap();
        db.set_client_active("1", false).unwrap();

        let retrieved = db.get_client("1").unwrap().unwrap();
        assert!(!retrieved.active);
    }

    #[test]
    fn test_delete_client() {
        let db = setup_db();

        db.insert_client(&make_client("1", "Ana")).unwrap();
        assert!(db.delete_client("1").unwrap());
        assert!(db.get_client("1").unwrap().is_none());
        assert!(!db.delete_client("1").unwrap());
    }
}
