//! Employee database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Employee, EmployeeRole};

impl Database {
    /// Insert a new employee.
    pub fn insert_employee(&self, employee: &Employee) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO employees (
                id, name, national_id, email, password_hash, role, active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                employee.id,
                employee.name,
                employee.national_id,
                employee.email,
                employee.password_hash,
                role_to_string(&employee.role),
                employee.active,
                employee.created_at,
                employee.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing employee.
    pub fn update_employee(&self, employee: &Employee) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE employees SET
                name = ?2,
                national_id = ?3,
                email = ?4,
                password_hash = ?5,
                role = ?6,
                active = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                employee.id,
                employee.name,
                employee.national_id,
                employee.email,
                employee.password_hash,
                role_to_string(&employee.role),
                employee.active,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an employee by ID.
    pub fn get_employee(&self, id: &str) -> DbResult<Option<Employee>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, national_id, email, password_hash, role, active,
                       created_at, updated_at
                FROM employees
                WHERE id = ?
                "#,
                [id],
                map_employee_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get an employee by login email.
    pub fn get_employee_by_email(&self, email: &str) -> DbResult<Option<Employee>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, national_id, email, password_hash, role, active,
                       created_at, updated_at
                FROM employees
                WHERE email = ?
                "#,
                [email],
                map_employee_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all employees, ordered by name.
    pub fn list_employees(&self) -> DbResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, national_id, email, password_hash, role, active,
                   created_at, updated_at
            FROM employees
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], map_employee_row)?;
        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?.try_into()?);
        }
        Ok(employees)
    }
}

/// Intermediate row struct for database mapping.
struct EmployeeRow {
    id: String,
    name: String,
    national_id: String,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
    created_at: String,
    updated_at: String,
}

fn map_employee_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmployeeRow> {
    Ok(EmployeeRow {
        id: row.get(0)?,
        name: row.get(1)?,
        national_id: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        role: row.get(5)?,
        active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = DbError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            role: string_to_role(&row.role)?,
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            email: row.email,
            password_hash: row.password_hash,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn role_to_string(role: &EmployeeRole) -> &'static str {
    role.as_str()
}

fn string_to_role(s: &str) -> Result<EmployeeRole, DbError> {
    match s {
        "admin" => Ok(EmployeeRole::Admin),
        _ => Err(DbError::Constraint(format!("Unknown employee role: {}", s))),
    }
}
