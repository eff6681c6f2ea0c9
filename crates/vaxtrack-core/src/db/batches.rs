//! Batch (lot) database operations.

use rusqlite::{params, OptionalExtension};

use super::{parse_date, Database, DbError, DbResult, DATE_FMT};
use crate::models::Batch;

impl Database {
    /// Insert a new batch.
    pub fn insert_batch(&self, batch: &Batch) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO batches (
                id, vaccine_id, code, initial_quantity, remaining_quantity,
                expiration_date, purchase_price, sale_price, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                batch.id,
                batch.vaccine_id,
                batch.code,
                batch.initial_quantity,
                batch.remaining_quantity,
                batch.expiration_date.format(DATE_FMT).to_string(),
                batch.purchase_price,
                batch.sale_price,
                batch.created_at,
                batch.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update batch master data. Quantities are not touched here: the
    /// remaining count only moves through the application-insert trigger.
    pub fn update_batch(&self, batch: &Batch) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE batches SET
                code = ?2,
                expiration_date = ?3,
                purchase_price = ?4,
                sale_price = ?5,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                batch.id,
                batch.code,
                batch.expiration_date.format(DATE_FMT).to_string(),
                batch.purchase_price,
                batch.sale_price,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a batch by ID.
    pub fn get_batch(&self, id: &str) -> DbResult<Option<Batch>> {
        self.conn
            .query_row(
                r#"
                SELECT id, vaccine_id, code, initial_quantity, remaining_quantity,
                       expiration_date, purchase_price, sale_price, created_at, updated_at
                FROM batches
                WHERE id = ?
                "#,
                [id],
                map_batch_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all batches of a vaccine, soonest expiration first.
    pub fn list_batches_for_vaccine(&self, vaccine_id: &str) -> DbResult<Vec<Batch>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, vaccine_id, code, initial_quantity, remaining_quantity,
                   expiration_date, purchase_price, sale_price, created_at, updated_at
            FROM batches
            WHERE vaccine_id = ?
            ORDER BY expiration_date, code
            "#,
        )?;

        let rows = stmt.query_map([vaccine_id], map_batch_row)?;
        let mut batches = Vec::new();
        for row in rows {
            batches.push(row?.try_into()?);
        }
        Ok(batches)
    }

    /// Delete a batch. Fails while appointments or applications reference it.
    pub fn delete_batch(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM batches WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct BatchRow {
    id: String,
    vaccine_id: String,
    code: String,
    initial_quantity: u32,
    remaining_quantity: u32,
    expiration_date: String,
    purchase_price: f64,
    sale_price: f64,
    created_at: String,
    updated_at: String,
}

fn map_batch_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BatchRow> {
    Ok(BatchRow {
        id: row.get(0)?,
        vaccine_id: row.get(1)?,
        code: row.get(2)?,
        initial_quantity: row.get(3)?,
        remaining_quantity: row.get(4)?,
        expiration_date: row.get(5)?,
        purchase_price: row.get(6)?,
        sale_price: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<BatchRow> for Batch {
    type Error = DbError;

    fn try_from(row: BatchRow) -> Result<Self, Self::Error> {
        Ok(Batch {
            expiration_date: parse_date(&row.expiration_date, "batches.expiration_date")?,
            id: row.id,
            vaccine_id: row.vaccine_id,
            code: row.code,
            initial_quantity: row.initial_quantity,
            remaining_quantity: row.remaining_quantity,
            purchase_price: row.purchase_price,
            sale_price: row.sale_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
