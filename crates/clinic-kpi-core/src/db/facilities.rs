//! Cabin and ward database operations.

use rusqlite::{params, params_from_iter};

use super::query::WhereClause;
use super::{Database, DbResult};
use crate::models::{BedUnit, UnitKind};

fn number_column(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Cabin => "cabin_number",
        UnitKind::Ward => "ward_number",
    }
}

impl Database {
    /// Insert a cabin or ward, returning its row ID.
    ///
    /// `occupied_beds` is derived from linked patients and not stored.
    pub fn insert_bed_unit(&self, unit: &BedUnit) -> DbResult<i64> {
        let sql = format!(
            "INSERT INTO {} ({}, name, bed_capacity, active) VALUES (?1, ?2, ?3, ?4)",
            unit.kind.table(),
            number_column(unit.kind)
        );
        self.conn.execute(
            &sql,
            params![unit.number, unit.name, unit.bed_capacity, unit.active],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find cabins or wards, optionally by active flag, ordered by ID.
    pub fn find_bed_units(&self, kind: UnitKind, active: Option<bool>) -> DbResult<Vec<BedUnit>> {
        let mut clause = WhereClause::new();
        clause.flag("u.active", active);

        let sql = format!(
            r#"
            SELECT u.id, u.{number}, u.name, u.bed_capacity, u.active,
                   (SELECT COUNT(*) FROM patients p WHERE p.{link} = u.id)
            FROM {table} u
            {filter}
            ORDER BY u.id
            "#,
            number = number_column(kind),
            link = kind.patient_column(),
            table = kind.table(),
            filter = clause.sql(),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(clause.params()), |row| {
            Ok(BedUnit {
                id: row.get(0)?,
                kind,
                number: row.get(1)?,
                name: row.get(2)?,
                bed_capacity: row.get(3)?,
                active: row.get(4)?,
                occupied_beds: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Put a unit into or out of maintenance.
    pub fn set_bed_unit_active(&self, kind: UnitKind, id: i64, active: bool) -> DbResult<bool> {
        let sql = format!("UPDATE {} SET active = ?1 WHERE id = ?2", kind.table());
        let rows_affected = self.conn.execute(&sql, params![active, id])?;
        Ok(rows_affected > 0)
    }
}
