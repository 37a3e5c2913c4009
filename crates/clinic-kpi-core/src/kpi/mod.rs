//! KPI aggregation over the clinic record collections.
//!
//! The [`KpiAggregator`] reads the collections through [`RecordStore`] and
//! returns a fresh [`KpiStats`](crate::models::KpiStats) value; nothing is
//! recomputed on read. The [`KpiDashboard`] owns snapshot lifecycle: the lazily
//! created default dashboard, range edits, refresh and export.

mod aggregator;
mod dashboard;
mod rates;
mod store;

pub use aggregator::*;
pub use dashboard::*;
pub use rates::*;
pub use store::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;

/// KPI errors.
#[derive(Error, Debug)]
pub enum KpiError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(i64),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

pub type KpiResult<T> = Result<T, KpiError>;
