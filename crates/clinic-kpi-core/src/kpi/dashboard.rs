//! Snapshot lifecycle: default dashboard, range edits, refresh and export.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::aggregator::{AggregatorSettings, KpiAggregator};
use super::{KpiError, KpiResult};
use crate::db::Database;
use crate::export::{KpiDashboardData, KpiExport};
use crate::models::{DateRange, KpiSnapshot};

/// Name given to the lazily created default dashboard.
pub const DEFAULT_DASHBOARD_NAME: &str = "Clinic KPI Dashboard";

/// Dashboard service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    /// Name of the default dashboard when it is first created
    pub default_name: String,
    /// Aggregator tunables used by every refresh
    pub aggregator: AggregatorSettings,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_DASHBOARD_NAME.to_string(),
            aggregator: AggregatorSettings::default(),
        }
    }
}

/// KPI dashboard manager.
pub struct KpiDashboard<'a> {
    db: &'a Database,
    settings: DashboardSettings,
}

impl<'a> KpiDashboard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_settings(db, DashboardSettings::default())
    }

    pub fn with_settings(db: &'a Database, settings: DashboardSettings) -> Self {
        Self { db, settings }
    }

    /// Get the default dashboard, creating it for the current month if missing.
    pub fn get_or_create_default(&self) -> KpiResult<KpiSnapshot> {
        self.get_or_create_default_on(Utc::now().date_naive())
    }

    /// As [`get_or_create_default`](Self::get_or_create_default) with an explicit `today`.
    ///
    /// A new default covers `[first of today's month, today]` and is refreshed
    /// once on creation. An existing default is returned as stored.
    pub fn get_or_create_default_on(&self, today: NaiveDate) -> KpiResult<KpiSnapshot> {
        if let Some(snapshot) = self.db.get_default_snapshot()? {
            return Ok(snapshot);
        }

        let range = DateRange::month_to_date(today);
        let id = self
            .db
            .insert_snapshot(&self.settings.default_name, &range, true)?;
        info!(id, date_from = %range.date_from, date_to = %range.date_to, "created default KPI dashboard");

        self.refresh(id)
    }

    /// Create an additional named snapshot. Stats stay zero until refreshed.
    pub fn create_snapshot(&self, name: &str, range: DateRange) -> KpiResult<KpiSnapshot> {
        check_range(&range)?;

        let id = self.db.insert_snapshot(name, &range, false)?;
        info!(id, name, "created KPI snapshot");

        self.load(id)
    }

    pub fn get_snapshot(&self, id: i64) -> KpiResult<KpiSnapshot> {
        self.load(id)
    }

    /// All snapshots, newest first.
    pub fn list_snapshots(&self) -> KpiResult<Vec<KpiSnapshot>> {
        Ok(self.db.list_snapshots()?)
    }

    /// Change a snapshot's window, then refresh it.
    pub fn update_range(&self, id: i64, range: DateRange) -> KpiResult<KpiSnapshot> {
        check_range(&range)?;

        if !self.db.update_snapshot_range(id, &range)? {
            warn!(id, "range update for missing KPI snapshot");
            return Err(KpiError::SnapshotNotFound(id));
        }
        info!(id, date_from = %range.date_from, date_to = %range.date_to, "updated KPI range");

        self.refresh(id)
    }

    /// Recompute every statistic for the snapshot's current range.
    ///
    /// The new values are written in one statement, so a failed pass leaves
    /// the previous values in place.
    pub fn refresh(&self, id: i64) -> KpiResult<KpiSnapshot> {
        let snapshot = self.load(id)?;

        let aggregator = KpiAggregator::with_settings(self.db, self.settings.aggregator);
        let stats = aggregator.compute(&snapshot.range)?;

        let refreshed_at = Utc::now().to_rfc3339();
        if !self.db.save_snapshot_stats(id, &stats, &refreshed_at)? {
            return Err(KpiError::SnapshotNotFound(id));
        }
        info!(id, date_from = %snapshot.range.date_from, date_to = %snapshot.range.date_to, "refreshed KPI snapshot");

        Ok(KpiSnapshot {
            stats,
            refreshed_at: Some(refreshed_at),
            ..snapshot
        })
    }

    /// Rounded display values for a snapshot, as last refreshed.
    pub fn dashboard_data(&self, id: i64) -> KpiResult<KpiDashboardData> {
        let snapshot = self.load(id)?;
        Ok(KpiDashboardData::from_snapshot(&snapshot))
    }

    /// Build the export document from the stored values. Does not refresh.
    pub fn export(&self, id: i64) -> KpiResult<KpiExport> {
        let snapshot = self.load(id)?;
        let export = KpiExport::from_snapshot(&snapshot)?;
        info!(id, export_id = %export.metadata.export_id, "exported KPI snapshot");
        Ok(export)
    }

    fn load(&self, id: i64) -> KpiResult<KpiSnapshot> {
        self.db.get_snapshot(id)?.ok_or_else(|| {
            warn!(id, "KPI snapshot not found");
            KpiError::SnapshotNotFound(id)
        })
    }
}

fn check_range(range: &DateRange) -> KpiResult<()> {
    if range.is_ordered() {
        Ok(())
    } else {
        Err(KpiError::InvalidRange {
            from: range.date_from,
            to: range.date_to,
        })
    }
}
