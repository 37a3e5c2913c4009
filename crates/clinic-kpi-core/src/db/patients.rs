//! Patient database operations.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::query::{DateFilter, WhereClause};
use super::{Database, DbResult};
use crate::models::{Patient, UnitKind};

/// Filter for patient lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientQuery {
    /// Registration date (calendar date of `created_at`)
    pub created: DateFilter,
    /// Admission flag
    pub admitted: Option<bool>,
}

const PATIENT_COLUMNS: &str = "id, name, is_admitted, cabin_id, ward_id, created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        is_admitted: row.get(2)?,
        cabin_id: row.get(3)?,
        ward_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    /// Insert a new patient, returning its row ID.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO patients (name, is_admitted, cabin_id, ward_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient.name,
                patient.is_admitted,
                patient.cabin_id,
                patient.ward_id,
                patient.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find patients matching a query, ordered by ID.
    pub fn find_patients(&self, query: &PatientQuery) -> DbResult<Vec<Patient>> {
        let mut clause = WhereClause::new();
        clause
            .date("date(created_at)", &query.created)
            .flag("is_admitted", query.admitted);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients {} ORDER BY id",
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), patient_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Admit a patient into a cabin or ward bed.
    pub fn admit_patient(&self, patient_id: i64, kind: UnitKind, unit_id: i64) -> DbResult<bool> {
        let sql = format!(
            "UPDATE patients SET is_admitted = 1, {} = ? WHERE id = ?",
            kind.patient_column()
        );
        let rows_affected = self.conn.execute(&sql, [unit_id, patient_id])?;
        Ok(rows_affected > 0)
    }

    /// Discharge a patient, freeing any cabin or ward bed.
    pub fn discharge_patient(&self, patient_id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET is_admitted = 0, cabin_id = NULL, ward_id = NULL WHERE id = ?",
            [patient_id],
        )?;
        Ok(rows_affected > 0)
    }
}
