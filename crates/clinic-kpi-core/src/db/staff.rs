//! Employee, attendance and payroll database operations.

use rusqlite::{params, params_from_iter, Row};

use super::query::{DateFilter, StateFilter, WhereClause};
use super::{parse_state, Database, DbResult};
use crate::models::{Attendance, Employee, Payroll, PayrollState, RecordState};

/// Filter for payroll lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollQuery {
    pub payment_date: DateFilter,
    pub state: StateFilter<PayrollState>,
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        employee_type: row.get(2)?,
        active: row.get(3)?,
    })
}

impl Database {
    // =========================================================================
    // Employees
    // =========================================================================

    /// Insert an employee, returning its row ID.
    pub fn insert_employee(&self, employee: &Employee) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO employees (name, employee_type, active) VALUES (?1, ?2, ?3)",
            params![employee.name, employee.employee_type, employee.active],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find employees, optionally by active flag, ordered by ID.
    pub fn find_employees(&self, active: Option<bool>) -> DbResult<Vec<Employee>> {
        let mut clause = WhereClause::new();
        clause.flag("active", active);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, employee_type, active FROM employees {} ORDER BY id",
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), employee_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark an employee as departed or returning.
    pub fn set_employee_active(&self, id: i64, active: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE employees SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(rows_affected > 0)
    }

    // =========================================================================
    // Attendance
    // =========================================================================

    /// Record one day of attendance, returning its row ID.
    ///
    /// Fails with a constraint error if the employee already has a row for that date.
    pub fn insert_attendance(&self, attendance: &Attendance) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO attendance (employee_id, attendance_date, status, overtime_hours)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                attendance.employee_id,
                attendance.attendance_date,
                attendance.status.as_str(),
                attendance.overtime_hours,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find attendance rows by date, ordered by ID.
    pub fn find_attendance(&self, date: &DateFilter) -> DbResult<Vec<Attendance>> {
        let mut clause = WhereClause::new();
        clause.date("attendance_date", date);

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT id, employee_id, attendance_date, status, overtime_hours
            FROM attendance {} ORDER BY id
            "#,
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, chrono::NaiveDate>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, employee_id, attendance_date, status, overtime_hours) = row?;
            records.push(Attendance {
                id,
                employee_id,
                attendance_date,
                status: parse_state(&status, "attendance status")?,
                overtime_hours,
            });
        }
        Ok(records)
    }

    // =========================================================================
    // Payroll
    // =========================================================================

    /// Insert a payroll row, returning its row ID.
    pub fn insert_payroll(&self, payroll: &Payroll) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO payrolls (employee_id, payment_date, state, net_salary)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                payroll.employee_id,
                payroll.payment_date,
                payroll.state.as_str(),
                payroll.net_salary,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find payroll rows matching a query, ordered by ID.
    pub fn find_payrolls(&self, query: &PayrollQuery) -> DbResult<Vec<Payroll>> {
        let mut clause = WhereClause::new();
        clause
            .date("payment_date", &query.payment_date)
            .states("state", &query.state);

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT id, employee_id, payment_date, state, net_salary
            FROM payrolls {} ORDER BY id
            "#,
            clause.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(clause.params()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, chrono::NaiveDate>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut payrolls = Vec::new();
        for row in rows {
            let (id, employee_id, payment_date, state, net_salary) = row?;
            payrolls.push(Payroll {
                id,
                employee_id,
                payment_date,
                state: parse_state(&state, "payroll state")?,
                net_salary,
            });
        }
        Ok(payrolls)
    }
}
