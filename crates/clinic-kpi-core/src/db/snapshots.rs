//! KPI snapshot persistence.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{DateRange, KpiSnapshot, KpiStats};

const SNAPSHOT_COLUMNS: &str = "id, name, date_from, date_to, stats, created_at, refreshed_at";

/// Intermediate row struct for database mapping.
struct SnapshotRow {
    id: i64,
    name: String,
    date_from: NaiveDate,
    date_to: NaiveDate,
    stats: String,
    created_at: String,
    refreshed_at: Option<String>,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            date_from: row.get(2)?,
            date_to: row.get(3)?,
            stats: row.get(4)?,
            created_at: row.get(5)?,
            refreshed_at: row.get(6)?,
        })
    }
}

impl TryFrom<SnapshotRow> for KpiSnapshot {
    type Error = DbError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let stats: KpiStats = serde_json::from_str(&row.stats)?;

        Ok(KpiSnapshot {
            id: row.id,
            name: row.name,
            range: DateRange::new(row.date_from, row.date_to),
            stats,
            created_at: row.created_at,
            refreshed_at: row.refreshed_at,
        })
    }
}

impl Database {
    /// Insert a snapshot with zeroed stats, returning its row ID.
    pub fn insert_snapshot(&self, name: &str, range: &DateRange, is_default: bool) -> DbResult<i64> {
        let stats_json = serde_json::to_string(&KpiStats::default())?;
        self.conn.execute(
            r#"
            INSERT INTO kpi_snapshots (name, date_from, date_to, stats, is_default)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![name, range.date_from, range.date_to, stats_json, is_default],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a snapshot by ID.
    pub fn get_snapshot(&self, id: i64) -> DbResult<Option<KpiSnapshot>> {
        self.conn
            .query_row(
                &format!("SELECT {SNAPSHOT_COLUMNS} FROM kpi_snapshots WHERE id = ?"),
                [id],
                SnapshotRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get the default dashboard snapshot, if it has been created.
    pub fn get_default_snapshot(&self) -> DbResult<Option<KpiSnapshot>> {
        self.conn
            .query_row(
                &format!("SELECT {SNAPSHOT_COLUMNS} FROM kpi_snapshots WHERE is_default = 1"),
                [],
                SnapshotRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all snapshots, newest first.
    pub fn list_snapshots(&self) -> DbResult<Vec<KpiSnapshot>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM kpi_snapshots ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map([], SnapshotRow::from_row)?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?.try_into()?);
        }
        Ok(snapshots)
    }

    /// Change the date range of a snapshot. Stored stats are left untouched.
    pub fn update_snapshot_range(&self, id: i64, range: &DateRange) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE kpi_snapshots SET date_from = ?1, date_to = ?2 WHERE id = ?3",
            params![range.date_from, range.date_to, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace every stored stat of a snapshot in a single statement.
    pub fn save_snapshot_stats(&self, id: i64, stats: &KpiStats, refreshed_at: &str) -> DbResult<bool> {
        let stats_json = serde_json::to_string(stats)?;
        let rows_affected = self.conn.execute(
            "UPDATE kpi_snapshots SET stats = ?1, refreshed_at = ?2 WHERE id = ?3",
            params![stats_json, refreshed_at, id],
        )?;
        Ok(rows_affected > 0)
    }
}
