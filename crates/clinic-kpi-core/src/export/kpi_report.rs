//! Structured KPI export document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::escape_csv;
use crate::models::{
    AppointmentStats, AttendanceStats, FinancialStats, KpiSnapshot, LabStats, OccupancyStats,
    PatientStats, RevenueStats,
};

/// Download file name for exported snapshots.
pub const EXPORT_FILE_NAME: &str = "clinic_kpi_export.json";

/// Content type of [`KpiExport::to_json`] output.
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Doctor group as exported: the most-booked doctor by name only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorStatsExport {
    pub most_booked_doctor: Option<String>,
    pub total_active_doctors: i64,
    pub avg_consultation_per_doctor: f64,
}

/// The statistics part of an export, grouped by category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiReport {
    pub dashboard_name: String,
    /// `YYYY-MM-DD`
    pub date_from: String,
    /// `YYYY-MM-DD`
    pub date_to: String,
    pub patient_stats: PatientStats,
    pub appointment_stats: AppointmentStats,
    pub revenue_stats: RevenueStats,
    pub doctor_stats: DoctorStatsExport,
    pub occupancy_stats: OccupancyStats,
    pub attendance_stats: AttendanceStats,
    pub lab_stats: LabStats,
    pub financial_stats: FinancialStats,
}

impl KpiReport {
    /// Group a snapshot's stored values. Nothing is recomputed.
    pub fn from_snapshot(snapshot: &KpiSnapshot) -> Self {
        let stats = &snapshot.stats;
        Self {
            dashboard_name: snapshot.name.clone(),
            date_from: snapshot.range.date_from.format("%Y-%m-%d").to_string(),
            date_to: snapshot.range.date_to.format("%Y-%m-%d").to_string(),
            patient_stats: stats.patient.clone(),
            appointment_stats: stats.appointment.clone(),
            revenue_stats: stats.revenue.clone(),
            doctor_stats: DoctorStatsExport {
                most_booked_doctor: stats.doctor.most_booked_doctor.as_ref().map(|d| d.name.clone()),
                total_active_doctors: stats.doctor.total_active_doctors,
                avg_consultation_per_doctor: stats.doctor.avg_consultation_per_doctor,
            },
            occupancy_stats: stats.occupancy.clone(),
            attendance_stats: stats.attendance.clone(),
            lab_stats: stats.lab.clone(),
            financial_stats: stats.financial.clone(),
        }
    }

    /// SHA-256 over the compact JSON encoding, hex encoded.
    pub fn checksum(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_string(self)?;
        Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
    }

    /// `(category, metric, value)` triples in export order.
    fn rows(&self) -> Vec<(&'static str, &'static str, String)> {
        let p = &self.patient_stats;
        let a = &self.appointment_stats;
        let r = &self.revenue_stats;
        let d = &self.doctor_stats;
        let o = &self.occupancy_stats;
        let t = &self.attendance_stats;
        let l = &self.lab_stats;
        let f = &self.financial_stats;

        vec![
            ("dashboard", "dashboard_name", self.dashboard_name.clone()),
            ("dashboard", "date_from", self.date_from.clone()),
            ("dashboard", "date_to", self.date_to.clone()),
            ("patient_stats", "total_patients", p.total_patients.to_string()),
            ("patient_stats", "new_patients", p.new_patients.to_string()),
            ("patient_stats", "patient_growth", p.patient_growth.to_string()),
            ("appointment_stats", "total_appointments", a.total_appointments.to_string()),
            ("appointment_stats", "completed_appointments", a.completed_appointments.to_string()),
            ("appointment_stats", "cancelled_appointments", a.cancelled_appointments.to_string()),
            ("appointment_stats", "completion_rate", a.completion_rate.to_string()),
            ("revenue_stats", "total_revenue", r.total_revenue.to_string()),
            ("revenue_stats", "consultation_revenue", r.consultation_revenue.to_string()),
            ("revenue_stats", "lab_test_revenue", r.lab_test_revenue.to_string()),
            ("revenue_stats", "revenue_growth", r.revenue_growth.to_string()),
            (
                "doctor_stats",
                "most_booked_doctor",
                d.most_booked_doctor.clone().unwrap_or_default(),
            ),
            ("doctor_stats", "total_active_doctors", d.total_active_doctors.to_string()),
            (
                "doctor_stats",
                "avg_consultation_per_doctor",
                d.avg_consultation_per_doctor.to_string(),
            ),
            ("occupancy_stats", "cabin_occupancy_rate", o.cabin_occupancy_rate.to_string()),
            ("occupancy_stats", "ward_occupancy_rate", o.ward_occupancy_rate.to_string()),
            ("occupancy_stats", "total_admitted_patients", o.total_admitted_patients.to_string()),
            ("attendance_stats", "total_staff", t.total_staff.to_string()),
            ("attendance_stats", "avg_attendance_rate", t.avg_attendance_rate.to_string()),
            ("attendance_stats", "total_overtime_hours", t.total_overtime_hours.to_string()),
            ("lab_stats", "total_lab_tests", l.total_lab_tests.to_string()),
            ("lab_stats", "completed_lab_tests", l.completed_lab_tests.to_string()),
            ("lab_stats", "pending_lab_tests", l.pending_lab_tests.to_string()),
            ("lab_stats", "lab_completion_rate", l.lab_completion_rate.to_string()),
            ("financial_stats", "total_payroll", f.total_payroll.to_string()),
            ("financial_stats", "avg_revenue_per_patient", f.avg_revenue_per_patient.to_string()),
            ("financial_stats", "profit_margin", f.profit_margin.to_string()),
        ]
    }
}

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportMetadata {
    /// Unique ID of this export
    pub export_id: String,
    /// Export timestamp
    pub exported_at: String,
    /// Snapshot the values were read from
    pub snapshot_id: i64,
    /// When the snapshot was last refreshed
    pub refreshed_at: Option<String>,
    /// SHA-256 of the report, for tamper detection
    pub checksum: String,
}

/// A KPI export: the grouped report plus metadata.
///
/// Serializes with the report groups at the top level and a `metadata` object
/// alongside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiExport {
    #[serde(flatten)]
    pub report: KpiReport,
    pub metadata: ExportMetadata,
}

impl KpiExport {
    /// Create an export from a snapshot's stored values.
    pub fn from_snapshot(snapshot: &KpiSnapshot) -> Result<Self, serde_json::Error> {
        let report = KpiReport::from_snapshot(snapshot);
        let checksum = report.checksum()?;

        Ok(Self {
            metadata: ExportMetadata {
                export_id: uuid::Uuid::new_v4().to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                snapshot_id: snapshot.id,
                refreshed_at: snapshot.refreshed_at.clone(),
                checksum,
            },
            report,
        })
    }

    /// True if the report still matches its recorded checksum.
    pub fn verify_checksum(&self) -> Result<bool, serde_json::Error> {
        Ok(self.report.checksum()? == self.metadata.checksum)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one metric per line.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("category,metric,value\n");

        for (category, metric, value) in self.report.rows() {
            csv.push_str(&format!("{},{},{}\n", category, metric, escape_csv(&value)));
        }

        csv
    }
}
