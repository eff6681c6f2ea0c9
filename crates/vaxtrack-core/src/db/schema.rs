//! SQLite schema definition.

/// Complete database schema for vaxtrack.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Clients
-- ============================================================================

CREATE TABLE IF NOT EXISTS clients (
    national_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    address TEXT,
    allergy_notes TEXT,
    observations TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_clients_name ON clients(name);
CREATE INDEX IF NOT EXISTS idx_clients_active ON clients(active);

-- ============================================================================
-- Employees
-- ============================================================================

CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    national_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'admin' CHECK (role IN ('admin')),
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_employees_email ON employees(email);

-- ============================================================================
-- Vaccines
-- ============================================================================

CREATE TABLE IF NOT EXISTS vaccines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    category TEXT,
    doses_required INTEGER NOT NULL DEFAULT 1 CHECK (doses_required >= 1),
    interval_days INTEGER NOT NULL DEFAULT 0 CHECK (interval_days >= 0),
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- FTS5 virtual table for catalog search
CREATE VIRTUAL TABLE IF NOT EXISTS vaccines_fts USING fts5(
    name,
    manufacturer,
    content='vaccines',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS vaccines_ai AFTER INSERT ON vaccines BEGIN
    INSERT INTO vaccines_fts(rowid, name, manufacturer)
    VALUES (new.rowid, new.name, new.manufacturer);
END;

CREATE TRIGGER IF NOT EXISTS vaccines_ad AFTER DELETE ON vaccines BEGIN
    INSERT INTO vaccines_fts(vaccines_fts, rowid, name, manufacturer)
    VALUES ('delete', old.rowid, old.name, old.manufacturer);
END;

CREATE TRIGGER IF NOT EXISTS vaccines_au AFTER UPDATE ON vaccines BEGIN
    INSERT INTO vaccines_fts(vaccines_fts, rowid, name, manufacturer)
    VALUES ('delete', old.rowid, old.name, old.manufacturer);
    INSERT INTO vaccines_fts(rowid, name, manufacturer)
    VALUES (new.rowid, new.name, new.manufacturer);
END;

-- ============================================================================
-- Batches
-- ============================================================================

CREATE TABLE IF NOT EXISTS batches (
    id TEXT PRIMARY KEY,
    vaccine_id TEXT NOT NULL REFERENCES vaccines(id),
    code TEXT NOT NULL,
    initial_quantity INTEGER NOT NULL CHECK (initial_quantity > 0),
    remaining_quantity INTEGER NOT NULL,
    expiration_date TEXT NOT NULL,
    purchase_price REAL NOT NULL DEFAULT 0,
    sale_price REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (vaccine_id, code),
    CHECK (remaining_quantity >= 0 AND remaining_quantity <= initial_quantity)
);

CREATE INDEX IF NOT EXISTS idx_batches_vaccine ON batches(vaccine_id);
CREATE INDEX IF NOT EXISTS idx_batches_expiration ON batches(expiration_date);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(national_id),
    batch_id TEXT NOT NULL REFERENCES batches(id),
    employee_id TEXT REFERENCES employees(id),
    scheduled_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled' CHECK (status IN ('scheduled', 'completed')),
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_client ON appointments(client_id);
CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);
CREATE INDEX IF NOT EXISTS idx_appointments_scheduled_at ON appointments(scheduled_at);

-- ============================================================================
-- Applications
-- ============================================================================

CREATE TABLE IF NOT EXISTS applications (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(national_id),
    employee_id TEXT NOT NULL REFERENCES employees(id),
    appointment_id TEXT REFERENCES appointments(id),
    batch_id TEXT NOT NULL REFERENCES batches(id),
    applied_at TEXT NOT NULL,
    dose_number INTEGER NOT NULL DEFAULT 1 CHECK (dose_number >= 1),
    adverse_reactions TEXT,
    notes TEXT,
    unit_purchase_price REAL NOT NULL,
    unit_sale_price REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_applications_client ON applications(client_id);
CREATE INDEX IF NOT EXISTS idx_applications_batch ON applications(batch_id);
CREATE INDEX IF NOT EXISTS idx_applications_applied_at ON applications(applied_at);

-- Row-level trigger: every recorded application consumes one dose.
-- The batch CHECK constraint aborts the insert when stock is exhausted.
CREATE TRIGGER IF NOT EXISTS applications_ai_stock AFTER INSERT ON applications BEGIN
    UPDATE batches
    SET remaining_quantity = remaining_quantity - 1,
        updated_at = datetime('now')
    WHERE id = new.batch_id;
END;

-- Row-level trigger: an application referencing an appointment completes
-- it and records the confirming employee.
CREATE TRIGGER IF NOT EXISTS applications_ai_complete AFTER INSERT ON applications
WHEN new.appointment_id IS NOT NULL
BEGIN
    UPDATE appointments
    SET status = 'completed',
        employee_id = new.employee_id,
        updated_at = datetime('now')
    WHERE id = new.appointment_id;
END;

-- ============================================================================
-- Session State
-- ============================================================================

CREATE TABLE IF NOT EXISTS session_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    fn seed_vaccine_and_batch(conn: &Connection, remaining: i64) {
        conn.execute(
            "INSERT INTO vaccines (id, name, manufacturer) VALUES ('v1', 'Tetravalent', 'BioPharm')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO batches (id, vaccine_id, code, initial_quantity, remaining_quantity,
             expiration_date, purchase_price, sale_price)
             VALUES ('b1', 'v1', 'L001', 5, ?1, '2027-01-01', 100.0, 30.0)",
            [remaining],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO clients (national_id, name, birth_date) VALUES ('c1', 'Ana', '1990-04-12')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO employees (id, name, national_id, email, password_hash)
             VALUES ('e1', 'Dr. Lima', 'n1', 'lima@clinic.test', 'hash')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_fts_trigger() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO vaccines (id, name, manufacturer) VALUES ('v1', 'Tetravalent', 'BioPharm')",
            [],
        )
        .unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM vaccines_fts WHERE vaccines_fts MATCH 'tetravalent'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM vaccines_fts WHERE vaccines_fts MATCH 'biopharm'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_stock_decrement_trigger() {
        let conn = setup_conn();
        seed_vaccine_and_batch(&conn, 5);

        conn.execute(
            "INSERT INTO applications (id, client_id, employee_id, batch_id, applied_at,
             unit_purchase_price, unit_sale_price)
             VALUES ('a1', 'c1', 'e1', 'b1', '2025-07-01T09:00:00', 20.0, 30.0)",
            [],
        )
        .unwrap();

        let remaining: i64 = conn
            .query_row("SELECT remaining_quantity FROM batches WHERE id = 'b1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(remaining, 4);
    }

    #[test]
    fn test_exhausted_stock_aborts_insert() {
        let conn = setup_conn();
        seed_vaccine_and_batch(&conn, 0);

        let result = conn.execute(
            "INSERT INTO applications (id, client_id, employee_id, batch_id, applied_at,
             unit_purchase_price, unit_sale_price)
             VALUES ('a1', 'c1', 'e1', 'b1', '2025-07-01T09:00:00', 20.0, 30.0)",
            [],
        );
        assert!(result.is_err());

        // The aborted insert left no application row behind
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_appointment_completion_trigger() {
        let conn = setup_conn();
        seed_vaccine_and_batch(&conn, 5);
        conn.execute(
            "INSERT INTO appointments (id, client_id, batch_id, scheduled_at)
             VALUES ('ap1', 'c1', 'b1', '2025-07-01T09:00:00')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO applications (id, client_id, employee_id, appointment_id, batch_id,
             applied_at, unit_purchase_price, unit_sale_price)
             VALUES ('a1', 'c1', 'e1', 'ap1', 'b1', '2025-07-01T09:05:00', 20.0, 30.0)",
            [],
        )
        .unwrap();

        let (status, employee_id): (String, Option<String>) = conn
            .query_row(
                "SELECT status, employee_id FROM appointments WHERE id = 'ap1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(status, "completed");
        assert_eq!(employee_id, Some("e1".into()));
    }

    #[test]
    fn test_remaining_cannot_exceed_initial() {
        let conn = setup_conn();
        seed_vaccine_and_batch(&conn, 5);

        let result = conn.execute(
            "UPDATE batches SET remaining_quantity = 6 WHERE id = 'b1'",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_domain_enforced() {
        let conn = setup_conn();
        seed_vaccine_and_batch(&conn, 5);

        let result = conn.execute(
            "INSERT INTO appointments (id, client_id, batch_id, scheduled_at, status)
             VALUES ('ap1', 'c1', 'b1', '2025-07-01T09:00:00', 'cancelled')",
            [],
        );
        assert!(result.is_err());
    }
}
