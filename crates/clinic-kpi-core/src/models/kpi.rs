//! KPI snapshot models.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive `[date_from, date_to]` window for time-scoped metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl DateRange {
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self { date_from, date_to }
    }

    /// From the first day of `today`'s month up to `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        Self::new(first, today)
    }

    /// A single day.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// False when `date_from` is after `date_to`.
    pub fn is_ordered(&self) -> bool {
        self.date_from <= self.date_to
    }

    /// Number of calendar days covered. Zero or negative for inverted ranges.
    pub fn days(&self) -> i64 {
        (self.date_to - self.date_from).num_days() + 1
    }

    /// The `days`-long window ending the day before `date_from`.
    ///
    /// The start is clamped to [`NaiveDate::MIN`]. `None` when `date_from` is
    /// already the earliest representable date.
    pub fn preceding(&self, days: i64) -> Option<Self> {
        let date_to = self.date_from.pred_opt()?;
        let date_from = self
            .date_from
            .checked_sub_days(Days::new(days.max(1).unsigned_abs()))
            .unwrap_or(NaiveDate::MIN);
        Some(Self::new(date_from, date_to))
    }
}

/// Patient registration statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientStats {
    pub total_patients: i64,
    pub new_patients: i64,
    pub patient_growth: f64,
}

/// Appointment statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentStats {
    pub total_appointments: i64,
    pub completed_appointments: i64,
    pub cancelled_appointments: i64,
    pub completion_rate: f64,
}

/// Revenue statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RevenueStats {
    pub total_revenue: f64,
    pub consultation_revenue: f64,
    pub lab_test_revenue: f64,
    pub revenue_growth: f64,
}

/// The doctor with the most appointments in range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedDoctor {
    pub doctor_id: i64,
    pub name: String,
    pub appointment_count: i64,
}

/// Doctor performance statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoctorStats {
    pub most_booked_doctor: Option<BookedDoctor>,
    pub total_active_doctors: i64,
    pub avg_consultation_per_doctor: f64,
}

/// Bed occupancy statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OccupancyStats {
    pub cabin_occupancy_rate: f64,
    pub ward_occupancy_rate: f64,
    pub total_admitted_patients: i64,
}

/// Staff attendance statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStats {
    pub total_staff: i64,
    pub avg_attendance_rate: f64,
    pub total_overtime_hours: f64,
}

/// Lab test statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabStats {
    pub total_lab_tests: i64,
    pub completed_lab_tests: i64,
    pub pending_lab_tests: i64,
    pub lab_completion_rate: f64,
}

/// Financial statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialStats {
    pub total_payroll: f64,
    pub avg_revenue_per_patient: f64,
    pub profit_margin: f64,
}

/// Every derived value of a snapshot, computed in one pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KpiStats {
    pub patient: PatientStats,
    pub appointment: AppointmentStats,
    pub revenue: RevenueStats,
    pub doctor: DoctorStats,
    pub occupancy: OccupancyStats,
    pub attendance: AttendanceStats,
    pub lab: LabStats,
    pub financial: FinancialStats,
}

/// The cached dashboard record for one date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiSnapshot {
    /// Row ID
    pub id: i64,
    /// Dashboard name
    pub name: String,
    /// Window for time-scoped metrics
    pub range: DateRange,
    /// Values from the last refresh (all zero before the first one)
    pub stats: KpiStats,
    /// Creation timestamp
    pub created_at: String,
    /// Last successful refresh, if any
    pub refreshed_at: Option<String>,
}

impl KpiSnapshot {
    /// True once a refresh has been persisted.
    pub fn is_refreshed(&self) -> bool {
        self.refreshed_at.is_some()
    }
}
