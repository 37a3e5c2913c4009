//! Appointment database operations.

use rusqlite::{params, params_from_iter, Row};

use super::query::{DateFilter, StateFilter, WhereClause};
use super::{parse_state, Database, DbResult};
use crate::models::{Appointment, AppointmentState, RecordState};

/// Filter for appointment lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentQuery {
    pub date: DateFilter,
    pub state: StateFilter<AppointmentState>,
}

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, appointment_date, state, total_amount";

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: i64,
    patient_id: i64,
    doctor_id: i64,
    appointment_date: chrono::NaiveDate,
    state: String,
    total_amount: f64,
}

impl AppointmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            doctor_id: row.get(2)?,
            appointment_date: row.get(3)?,
            state: row.get(4)?,
            total_amount: row.get(5)?,
        })
    }

    fn into_appointment(self) -> DbResult<Appointment> {
        Ok(Appointment {
            id: self.id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            state: parse_state(&self.state, "appointment state")?,
            total_amount: self.total_amount,
        })
    }
}

impl Database {
    /// Insert a new appointment, returning its row ID.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                patient_id, doctor_id, appointment_date, state, total_amount
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                appointment.patient_id,
                appointment.doctor_id,
                appointment.appointment_date,
                appointment.state.as_str(),
                appointment.total_amount,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find appointments matching a query, ordered by ID.
    pub fn find_appointments(&self, query: &AppointmentQuery) -> DbResult<Vec<Appointment>> {
        let mut clause = WhereClause::new();
        clause
            .date("appointment_date", &query.date)
            .states("state", &query.state);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments {} ORDER BY id",
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), AppointmentRow::from_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.into_appointment()?);
        }
        Ok(appointments)
    }

    /// Move an appointment to a new state.
    pub fn set_appointment_state(&self, id: i64, state: AppointmentState) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET state = ?1 WHERE id = ?2",
            params![state.as_str(), id],
        )?;
        Ok(rows_affected > 0)
    }
}
