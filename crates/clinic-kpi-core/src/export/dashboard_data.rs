//! Flat, display-rounded view of a snapshot.

use serde::{Deserialize, Serialize};

use crate::kpi::round2;
use crate::models::KpiSnapshot;

/// Shown in place of the most-booked doctor when no appointment is in range.
pub const NO_DOCTOR_LABEL: &str = "N/A";

/// Values for a dashboard view: every rate and amount rounded to two decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiDashboardData {
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
    pub most_booked_doctor: String,
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

impl KpiDashboardData {
    pub fn from_snapshot(snapshot: &KpiSnapshot) -> Self {
        let s = &snapshot.stats;
        Self {
            total_patients: s.patient.total_patients,
            new_patients: s.patient.new_patients,
            patient_growth: round2(s.patient.patient_growth),
            total_appointments: s.appointment.total_appointments,
            completed_appointments: s.appointment.completed_appointments,
            cancelled_appointments: s.appointment.cancelled_appointments,
            appointment_completion_rate: round2(s.appointment.completion_rate),
            total_revenue: round2(s.revenue.total_revenue),
            consultation_revenue: round2(s.revenue.consultation_revenue),
            lab_test_revenue: round2(s.revenue.lab_test_revenue),
            revenue_growth: round2(s.revenue.revenue_growth),
            most_booked_doctor: s
                .doctor
                .most_booked_doctor
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| NO_DOCTOR_LABEL.to_string()),
            total_active_doctors: s.doctor.total_active_doctors,
            avg_consultation_per_doctor: round2(s.doctor.avg_consultation_per_doctor),
            cabin_occupancy_rate: round2(s.occupancy.cabin_occupancy_rate),
            ward_occupancy_rate: round2(s.occupancy.ward_occupancy_rate),
            total_admitted_patients: s.occupancy.total_admitted_patients,
            total_staff: s.attendance.total_staff,
            avg_attendance_rate: round2(s.attendance.avg_attendance_rate),
            total_overtime_hours: round2(s.attendance.total_overtime_hours),
            total_lab_tests: s.lab.total_lab_tests,
            completed_lab_tests: s.lab.completed_lab_tests,
            pending_lab_tests: s.lab.pending_lab_tests,
            lab_completion_rate: round2(s.lab.lab_completion_rate),
            total_payroll: round2(s.financial.total_payroll),
            avg_revenue_per_patient: round2(s.financial.avg_revenue_per_patient),
            profit_margin: round2(s.financial.profit_margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookedDoctor, DateRange, KpiStats};
    use chrono::NaiveDate;

    fn snapshot(stats: KpiStats) -> KpiSnapshot {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        KpiSnapshot {
            id: 1,
            name: "Clinic KPI Dashboard".into(),
            range: DateRange::day(day),
            stats,
            created_at: "2024-03-01 08:00:00".into(),
            refreshed_at: None,
        }
    }

    #[test]
    fn test_rounding() {
        let mut stats = KpiStats::default();
        stats.patient.patient_growth = 66.666_666_666;
        stats.revenue.total_revenue = 1234.5678;
        stats.attendance.avg_attendance_rate = 33.333_333;

        let data = KpiDashboardData::from_snapshot(&snapshot(stats));
        assert_eq!(data.patient_growth, 66.67);
        assert_eq!(data.total_revenue, 1234.57);
        assert_eq!(data.avg_attendance_rate, 33.33);
    }

    #[test]
    fn test_missing_doctor_label() {
        let data = KpiDashboardData::from_snapshot(&snapshot(KpiStats::default()));
        assert_eq!(data.most_booked_doctor, NO_DOCTOR_LABEL);

        let mut stats = KpiStats::default();
        stats.doctor.most_booked_doctor = Some(BookedDoctor {
            doctor_id: 2,
            name: "Dr. B".into(),
            appointment_count: 3,
        });
        let data = KpiDashboardData::from_snapshot(&snapshot(stats));
        assert_eq!(data.most_booked_doctor, "Dr. B");
    }
}
