//! Doctor database operations.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::query::WhereClause;
use super::{Database, DbResult};
use crate::models::Doctor;

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        active: row.get(3)?,
    })
}

impl Database {
    /// Insert a new doctor, returning its row ID.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO doctors (name, specialization, active) VALUES (?1, ?2, ?3)",
            params![doctor.name, doctor.specialization, doctor.active],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                "SELECT id, name, specialization, active FROM doctors WHERE id = ?",
                [id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find doctors, optionally by active flag, ordered by ID.
    pub fn find_doctors(&self, active: Option<bool>) -> DbResult<Vec<Doctor>> {
        let mut clause = WhereClause::new();
        clause.flag("active", active);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, specialization, active FROM doctors {} ORDER BY id",
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), doctor_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Archive or restore a doctor.
    pub fn set_doctor_active(&self, id: i64, active: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctors SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(rows_affected > 0)
    }
}
