//! Clinic KPI Core Library
//!
//! KPI dashboard for a clinic-management system: date-ranged statistics over
//! patients, appointments, doctors, beds, lab tests, payroll and attendance.
//!
//! # Architecture
//!
//! ```text
//!   patients  appointments  doctors  cabins/wards  lab_tests  payrolls  attendance
//!       │          │           │          │            │          │          │
//!       └──────────┴───────────┴────┬─────┴────────────┴──────────┴──────────┘
//!                                   │  RecordStore (read-only queries)
//!                                   ▼
//!                     ┌───────────────────────────┐
//!                     │       KpiAggregator       │
//!                     │  8 stat groups, 1 pass    │
//!                     └─────────────┬─────────────┘
//!                                   │  KpiStats
//!                                   ▼
//!                     ┌───────────────────────────┐
//!                     │       KpiDashboard        │
//!                     │  snapshot: range + stats  │
//!                     │  single UPDATE on refresh │
//!                     └─────────────┬─────────────┘
//!                                   │
//!                     ┌─────────────┴─────────────┐
//!                     ▼                           ▼
//!              Dashboard data               KPI export
//!             (rounded, flat)        (grouped JSON / CSV + checksum)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite storage for the record collections and KPI snapshots
//! - [`models`]: Domain types (Patient, Appointment, KpiSnapshot, etc.)
//! - [`kpi`]: Aggregator, record-store seam and dashboard service
//! - [`export`]: Export documents
//! - [`config`]: Layered configuration
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod db;
pub mod export;
pub mod kpi;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use crate::config::KpiConfig;
pub use db::Database;
pub use export::{KpiDashboardData, KpiExport, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use kpi::{
    AggregatorSettings, DashboardSettings, KpiAggregator, KpiDashboard, KpiError, RecordStore,
};
pub use models::{DateRange, KpiSnapshot, KpiStats};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use models::{
    Appointment, AppointmentState, Attendance, AttendanceStatus, BedUnit, Doctor, Employee,
    LabTest, LabTestState, Patient, Payroll, PayrollState, RecordState, UnitKind,
};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicKpiError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for ClinicKpiError {
    fn from(e: db::DbError) -> Self {
        ClinicKpiError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicKpiError {
    fn from(e: serde_json::Error) -> Self {
        ClinicKpiError::SerializationError(e.to_string())
    }
}

impl From<KpiError> for ClinicKpiError {
    fn from(e: KpiError) -> Self {
        match e {
            KpiError::SnapshotNotFound(id) => ClinicKpiError::NotFound(format!("KPI snapshot {}", id)),
            KpiError::InvalidRange { .. } => ClinicKpiError::InvalidInput(e.to_string()),
            KpiError::Json(e) => e.into(),
            KpiError::Database(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for ClinicKpiError {
    fn from(e: anyhow::Error) -> Self {
        ClinicKpiError::ConfigError(format!("{:#}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicKpiError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicKpiError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicKpiCore>, ClinicKpiError> {
    let db = Database::open(&path)?;
    Ok(ClinicKpiCore::wrap(db, DashboardSettings::default()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ClinicKpiCore>, ClinicKpiError> {
    let db = Database::open_in_memory()?;
    Ok(ClinicKpiCore::wrap(db, DashboardSettings::default()))
}

/// Open the database named by the configuration, with its dashboard settings.
///
/// `config_path` is an optional TOML file; `CLINIC_KPI_*` environment
/// variables override it.
#[uniffi::export]
pub fn open_database_with_config(
    config_path: Option<String>,
) -> Result<Arc<ClinicKpiCore>, ClinicKpiError> {
    let config = KpiConfig::load(config_path.as_deref().map(Path::new))?;
    let db = Database::open(&config.database_path)?;
    Ok(ClinicKpiCore::wrap(db, config.dashboard_settings()))
}

/// Install the log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref().unwrap_or("info"))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicKpiCore {
    db: Arc<Mutex<Database>>,
    settings: DashboardSettings,
}

impl ClinicKpiCore {
    fn wrap(db: Database, settings: DashboardSettings) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            settings,
        })
    }
}

#[uniffi::export]
impl ClinicKpiCore {
    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    /// Get the default dashboard, creating it for the current month if missing.
    pub fn get_or_create_default_snapshot(&self) -> Result<FfiKpiSnapshot, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.get_or_create_default()?.into())
    }

    /// Create a named snapshot. Dates are `YYYY-MM-DD`.
    pub fn create_snapshot(
        &self,
        name: String,
        date_from: String,
        date_to: String,
    ) -> Result<FfiKpiSnapshot, ClinicKpiError> {
        let range = parse_range(&date_from, &date_to)?;
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.create_snapshot(&name, range)?.into())
    }

    pub fn get_snapshot(&self, snapshot_id: i64) -> Result<FfiKpiSnapshot, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.get_snapshot(snapshot_id)?.into())
    }

    /// All snapshots, newest first.
    pub fn list_snapshots(&self) -> Result<Vec<FfiKpiSnapshot>, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        let snapshots = dashboard.list_snapshots()?;
        Ok(snapshots.into_iter().map(|s| s.into()).collect())
    }

    /// Change a snapshot's date range and refresh it.
    pub fn update_range(
        &self,
        snapshot_id: i64,
        date_from: String,
        date_to: String,
    ) -> Result<FfiKpiSnapshot, ClinicKpiError> {
        let range = parse_range(&date_from, &date_to)?;
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.update_range(snapshot_id, range)?.into())
    }

    /// Recompute every statistic of a snapshot.
    pub fn refresh(&self, snapshot_id: i64) -> Result<FfiKpiSnapshot, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.refresh(snapshot_id)?.into())
    }

    /// Rounded dashboard values as JSON.
    pub fn dashboard_data_json(&self, snapshot_id: i64) -> Result<String, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        let data = dashboard.dashboard_data(snapshot_id)?;
        Ok(serde_json::to_string_pretty(&data)?)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a snapshot as JSON.
    pub fn export_json(&self, snapshot_id: i64) -> Result<String, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.export(snapshot_id)?.to_json()?)
    }

    /// Export a snapshot as CSV.
    pub fn export_csv(&self, snapshot_id: i64) -> Result<String, ClinicKpiError> {
        let db = self.db.lock()?;
        let dashboard = KpiDashboard::with_settings(&db, self.settings.clone());
        Ok(dashboard.export(snapshot_id)?.to_csv())
    }

    /// Suggested download file name for [`export_json`](Self::export_json).
    pub fn export_file_name(&self) -> String {
        EXPORT_FILE_NAME.to_string()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Register a patient. `registered_on` defaults to now.
    pub fn add_patient(
        &self,
        name: String,
        registered_on: Option<String>,
    ) -> Result<i64, ClinicKpiError> {
        let patient = match registered_on {
            Some(date) => Patient::registered_on(name, parse_date(&date)?),
            None => Patient::new(name),
        };
        let db = self.db.lock()?;
        Ok(db.insert_patient(&patient)?)
    }

    /// Admit a patient into a `cabin` or `ward`.
    pub fn admit_patient(
        &self,
        patient_id: i64,
        unit_kind: String,
        unit_id: i64,
    ) -> Result<bool, ClinicKpiError> {
        let kind = parse_unit_kind(&unit_kind)?;
        let db = self.db.lock()?;
        Ok(db.admit_patient(patient_id, kind, unit_id)?)
    }

    pub fn discharge_patient(&self, patient_id: i64) -> Result<bool, ClinicKpiError> {
        let db = self.db.lock()?;
        Ok(db.discharge_patient(patient_id)?)
    }

    pub fn add_doctor(&self, name: String, specialization: String) -> Result<i64, ClinicKpiError> {
        let db = self.db.lock()?;
        Ok(db.insert_doctor(&Doctor::new(name, specialization))?)
    }

    pub fn set_doctor_active(&self, doctor_id: i64, active: bool) -> Result<bool, ClinicKpiError> {
        let db = self.db.lock()?;
        Ok(db.set_doctor_active(doctor_id, active)?)
    }

    pub fn add_appointment(
        &self,
        patient_id: i64,
        doctor_id: i64,
        appointment_date: String,
        state: String,
        total_amount: f64,
    ) -> Result<i64, ClinicKpiError> {
        let appointment = Appointment::new(patient_id, doctor_id, parse_date(&appointment_date)?)
            .with_state(parse_state::<AppointmentState>(&state, "appointment state")?)
            .with_amount(total_amount);
        let db = self.db.lock()?;
        Ok(db.insert_appointment(&appointment)?)
    }

    /// Add a `cabin` or `ward` with the given bed capacity.
    pub fn add_bed_unit(
        &self,
        unit_kind: String,
        number: String,
        bed_capacity: i64,
    ) -> Result<i64, ClinicKpiError> {
        let kind = parse_unit_kind(&unit_kind)?;
        if bed_capacity < 1 {
            return Err(ClinicKpiError::InvalidInput(format!(
                "bed capacity must be at least 1, got {}",
                bed_capacity
            )));
        }
        let db = self.db.lock()?;
        Ok(db.insert_bed_unit(&BedUnit::new(kind, number, bed_capacity))?)
    }

    pub fn add_lab_test(
        &self,
        patient_id: i64,
        test_date: String,
        state: String,
        test_cost: f64,
    ) -> Result<i64, ClinicKpiError> {
        let test = LabTest::new(patient_id, parse_date(&test_date)?, test_cost)
            .with_state(parse_state::<LabTestState>(&state, "lab test state")?);
        let db = self.db.lock()?;
        Ok(db.insert_lab_test(&test)?)
    }

    pub fn add_employee(&self, name: String, employee_type: String) -> Result<i64, ClinicKpiError> {
        let db = self.db.lock()?;
        Ok(db.insert_employee(&Employee::new(name, employee_type))?)
    }

    pub fn add_attendance(
        &self,
        employee_id: i64,
        attendance_date: String,
        status: String,
        overtime_hours: f64,
    ) -> Result<i64, ClinicKpiError> {
        let mut attendance = Attendance::new(
            employee_id,
            parse_date(&attendance_date)?,
            parse_state::<AttendanceStatus>(&status, "attendance status")?,
        );
        attendance.overtime_hours = overtime_hours;
        let db = self.db.lock()?;
        Ok(db.insert_attendance(&attendance)?)
    }

    pub fn add_payroll(
        &self,
        employee_id: i64,
        payment_date: String,
        state: String,
        net_salary: f64,
    ) -> Result<i64, ClinicKpiError> {
        let payroll = Payroll::new(employee_id, parse_date(&payment_date)?, net_salary)
            .with_state(parse_state::<PayrollState>(&state, "payroll state")?);
        let db = self.db.lock()?;
        Ok(db.insert_payroll(&payroll)?)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ClinicKpiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ClinicKpiError::InvalidInput(format!("bad date {:?}: {}", value, e)))
}

fn parse_range(date_from: &str, date_to: &str) -> Result<DateRange, ClinicKpiError> {
    Ok(DateRange::new(parse_date(date_from)?, parse_date(date_to)?))
}

fn parse_state<S: RecordState>(value: &str, what: &str) -> Result<S, ClinicKpiError> {
    S::parse(value).ok_or_else(|| ClinicKpiError::InvalidInput(format!("unknown {}: {}", what, value)))
}

fn parse_unit_kind(value: &str) -> Result<UnitKind, ClinicKpiError> {
    match value {
        "cabin" => Ok(UnitKind::Cabin),
        "ward" => Ok(UnitKind::Ward),
        _ => Err(ClinicKpiError::InvalidInput(format!("unknown unit kind: {}", value))),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe KPI snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiKpiSnapshot {
    pub id: i64,
    pub name: String,
    pub date_from: String,
    pub date_to: String,
    pub created_at: String,
    pub refreshed_at: Option<String>,
    pub stats: FfiKpiStats,
}

impl From<KpiSnapshot> for FfiKpiSnapshot {
    fn from(snapshot: KpiSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            date_from: snapshot.range.date_from.format("%Y-%m-%d").to_string(),
            date_to: snapshot.range.date_to.format("%Y-%m-%d").to_string(),
            created_at: snapshot.created_at,
            refreshed_at: snapshot.refreshed_at,
            stats: snapshot.stats.into(),
        }
    }
}

/// FFI-safe flat KPI statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiKpiStats {
    pub total_patients: i64,
    pub new_patients: i64,
    pub patient_growth: f64,
    pub total_appointments: i64,
    pub completed_appointments: i64,
    pub cancelled_appointments: i64,
    pub appointment_completion_rate: f64,
    pub total_revenue: f64,
    pub consultation_revenue: f64,
    pub lab_test_revenue: f64,
    pub revenue_growth: f64,
    pub most_booked_doctor_id: Option<i64>,
    pub most_booked_doctor_name: Option<String>,
    pub total_active_doctors: i64,
    pub avg_consultation_per_doctor: f64,
    pub cabin_occupancy_rate: f64,
    pub ward_occupancy_rate: f64,
    pub total_admitted_patients: i64,
    pub total_staff: i64,
    pub avg_attendance_rate: f64,
    pub total_overtime_hours: f64,
    pub total_lab_tests: i64,
    pub completed_lab_tests: i64,
    pub pending_lab_tests: i64,
    pub lab_completion_rate: f64,
    pub total_payroll: f64,
    pub avg_revenue_per_patient: f64,
    pub profit_margin: f64,
}

impl From<KpiStats> for FfiKpiStats {
    fn from(stats: KpiStats) -> Self {
        let (most_booked_doctor_id, most_booked_doctor_name) = match stats.doctor.most_booked_doctor
        {
            Some(doctor) => (Some(doctor.doctor_id), Some(doctor.name)),
            None => (None, None),
        };

        Self {
            total_patients: stats.patient.total_patients,
            new_patients: stats.patient.new_patients,
            patient_growth: stats.patient.patient_growth,
            total_appointments: stats.appointment.total_appointments,
            completed_appointments: stats.appointment.completed_appointments,
            cancelled_appointments: stats.appointment.cancelled_appointments,
            appointment_completion_rate: stats.appointment.completion_rate,
            total_revenue: stats.revenue.total_revenue,
            consultation_revenue: stats.revenue.consultation_revenue,
            lab_test_revenue: stats.revenue.lab_test_revenue,
            revenue_growth: stats.revenue.revenue_growth,
            most_booked_doctor_id,
            most_booked_doctor_name,
            total_active_doctors: stats.doctor.total_active_doctors,
            avg_consultation_per_doctor: stats.doctor.avg_consultation_per_doctor,
            cabin_occupancy_rate: stats.occupancy.cabin_occupancy_rate,
            ward_occupancy_rate: stats.occupancy.ward_occupancy_rate,
            total_admitted_patients: stats.occupancy.total_admitted_patients,
            total_staff: stats.attendance.total_staff,
            avg_attendance_rate: stats.attendance.avg_attendance_rate,
            total_overtime_hours: stats.attendance.total_overtime_hours,
            total_lab_tests: stats.lab.total_lab_tests,
            completed_lab_tests: stats.lab.completed_lab_tests,
            pending_lab_tests: stats.lab.pending_lab_tests,
            lab_completion_rate: stats.lab.lab_completion_rate,
            total_payroll: stats.financial.total_payroll,
            avg_revenue_per_patient: stats.financial.avg_revenue_per_patient,
            profit_margin: stats.financial.profit_margin,
        }
    }
}
