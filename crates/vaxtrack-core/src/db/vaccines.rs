//! Vaccine catalog database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Vaccine;

impl Database {
    /// Insert a new vaccine.
    pub fn insert_vaccine(&self, vaccine: &Vaccine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO vaccines (
                id, name, manufacturer, category, doses_required, interval_days,
                active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                vaccine.id,
                vaccine.name,
                vaccine.manufacturer,
                vaccine.category,
                vaccine.doses_required,
                vaccine.interval_days,
                vaccine.active,
                vaccine.created_at,
                vaccine.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing vaccine.
    pub fn update_vaccine(&self, vaccine: &Vaccine) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE vaccines SET
                name = ?2,
                manufacturer = ?3,
                category = ?4,
                doses_required = ?5,
                interval_days = ?6,
                active = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                vaccine.id,
                vaccine.name,
                vaccine.manufacturer,
                vaccine.category,
                vaccine.doses_required,
                vaccine.interval_days,
                vaccine.active,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a vaccine by ID.
    pub fn get_vaccine(&self, id: &str) -> DbResult<Option<Vaccine>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, manufacturer, category, doses_required, interval_days,
                       active, created_at, updated_at
                FROM vaccines
                WHERE id = ?
                "#,
                [id],
                map_vaccine_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List vaccines, ordered by name.
    pub fn list_vaccines(&self, active_only: bool) -> DbResult<Vec<Vaccine>> {
        let sql = if active_only {
            r#"
            SELECT id, name, manufacturer, category, doses_required, interval_days,
                   active, created_at, updated_at
            FROM vaccines
            WHERE active = 1
            ORDER BY name
            "#
        } else {
            r#"
            SELECT id, name, manufacturer, category, doses_required, interval_days,
                   active, created_at, updated_at
            FROM vaccines
            ORDER BY name
            "#
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map_vaccine_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search active vaccines using FTS5 (BM25 ranking).
    pub fn search_vaccines_fts(&self, query: &str, limit: usize) -> DbResult<Vec<Vaccine>> {
        let escaped_query = escape_fts_query(query);
        if escaped_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT v.id, v.name, v.manufacturer, v.category, v.doses_required,
                   v.interval_days, v.active, v.created_at, v.updated_at,
                   bm25(vaccines_fts) as rank
            FROM vaccines v
            JOIN vaccines_fts fts ON v.rowid = fts.rowid
            WHERE vaccines_fts MATCH ?
            AND v.active = 1
            ORDER BY rank
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![escaped_query, limit as i64], map_vaccine_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark a vaccine active or inactive.
    pub fn set_vaccine_active(&self, id: &str, active: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE vaccines SET active = ?, updated_at = datetime('now') WHERE id = ?",
            params![active, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a vaccine. Fails while batches reference it.
    pub fn delete_vaccine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM vaccines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_vaccine_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vaccine> {
    Ok(Vaccine {
        id: row.get(0)?,
        name: row.get(1)?,
        manufacturer: row.get(2)?,
        category: row.get(3)?,
        doses_required: row.get(4)?,
        interval_days: row.get(5)?,
        active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Escape special FTS5 characters and prepare query for prefix matching.
fn escape_fts_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" ")
}
