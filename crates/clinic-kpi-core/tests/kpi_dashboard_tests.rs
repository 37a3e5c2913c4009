//! Dashboard integration tests.

use chrono::{Days, NaiveDate};

use clinic_kpi_core::db::Database;
use clinic_kpi_core::kpi::{KpiDashboard, KpiError};
use clinic_kpi_core::models::{
    Appointment, AppointmentState, Attendance, AttendanceStatus, BedUnit, DateRange, Doctor,
    Employee, KpiStats, LabTest, LabTestState, Patient, Payroll, PayrollState, UnitKind,
};
use clinic_kpi_core::{open_database_in_memory, ClinicKpiError, EXPORT_FILE_NAME};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march() -> DateRange {
    DateRange::new(date(2024, 3, 1), date(2024, 3, 31))
}

/// A small clinic with activity in February and March 2024.
fn seed_clinic(db: &Database) {
    let mut patients = Vec::new();
    for day in 1..=6 {
        patients.push(
            db.insert_patient(&Patient::registered_on(format!("Feb {}", day), date(2024, 2, day)))
                .unwrap(),
        );
    }
    for day in [3, 9, 15, 27] {
        patients.push(
            db.insert_patient(&Patient::registered_on(format!("Mar {}", day), date(2024, 3, day)))
                .unwrap(),
        );
    }

    let a = db
        .insert_doctor(&Doctor::new("Dr. Akter".into(), "medicine".into()))
        .unwrap();
    let b = db
        .insert_doctor(&Doctor::new("Dr. Bose".into(), "surgery".into()))
        .unwrap();

    // Dr. Akter: 7 appointments, Dr. Bose: 3
    let states = [
        AppointmentState::Done,
        AppointmentState::Done,
        AppointmentState::Done,
        AppointmentState::Done,
        AppointmentState::Cancelled,
        AppointmentState::Confirmed,
        AppointmentState::Draft,
    ];
    for (i, state) in states.into_iter().enumerate() {
        db.insert_appointment(
            &Appointment::new(patients[i], a, date(2024, 3, 10))
                .with_state(state)
                .with_amount(100.0),
        )
        .unwrap();
    }
    for i in 0..3 {
        db.insert_appointment(
            &Appointment::new(patients[i], b, date(2024, 3, 20))
                .with_state(AppointmentState::InProgress)
                .with_amount(50.0),
        )
        .unwrap();
    }
    // Baseline window
    db.insert_appointment(
        &Appointment::new(patients[0], a, date(2024, 2, 20))
            .with_state(AppointmentState::Done)
            .with_amount(250.0),
    )
    .unwrap();

    db.insert_lab_test(
        &LabTest::new(patients[6], date(2024, 3, 11), 100.0).with_state(LabTestState::Completed),
    )
    .unwrap();
    db.insert_lab_test(&LabTest::new(patients[7], date(2024, 3, 12), 80.0))
        .unwrap();

    let ward = db
        .insert_bed_unit(&BedUnit::new(UnitKind::Ward, "W-1".into(), 10))
        .unwrap();
    for &patient in &patients[..4] {
        db.admit_patient(patient, UnitKind::Ward, ward).unwrap();
    }

    let nurse = db
        .insert_employee(&Employee::new("Rina".into(), "nurse".into()))
        .unwrap();
    db.insert_attendance(&Attendance::new(nurse, date(2024, 3, 4), AttendanceStatus::Present))
        .unwrap();
    db.insert_payroll(&Payroll::new(nurse, date(2024, 3, 31), 100.0).with_state(PayrollState::Paid))
        .unwrap();
}

#[test]
fn test_full_refresh() {
    let db = Database::open_in_memory().unwrap();
    seed_clinic(&db);

    let dashboard = KpiDashboard::new(&db);
    let snapshot = dashboard.create_snapshot("March", march()).unwrap();
    let stats = dashboard.refresh(snapshot.id).unwrap().stats;

    assert_eq!(stats.patient.total_patients, 10);
    assert_eq!(stats.patient.new_patients, 4);
    assert!((stats.patient.patient_growth - 66.666_666_666).abs() < 1e-6);

    assert_eq!(stats.appointment.total_appointments, 10);
    assert_eq!(stats.appointment.completed_appointments, 4);
    assert_eq!(stats.appointment.cancelled_appointments, 1);
    assert_eq!(stats.appointment.completion_rate, 40.0);

    assert_eq!(stats.revenue.consultation_revenue, 400.0);
    assert_eq!(stats.revenue.lab_test_revenue, 100.0);
    assert_eq!(stats.revenue.total_revenue, 500.0);
    assert_eq!(stats.revenue.revenue_growth, 100.0);

    let top = stats.doctor.most_booked_doctor.clone().unwrap();
    assert_eq!(top.name, "Dr. Akter");
    assert_eq!(top.appointment_count, 7);
    assert_eq!(stats.doctor.total_active_doctors, 2);
    assert_eq!(stats.doctor.avg_consultation_per_doctor, 5.0);

    assert_eq!(stats.occupancy.ward_occupancy_rate, 40.0);
    assert_eq!(stats.occupancy.cabin_occupancy_rate, 0.0);
    assert_eq!(stats.occupancy.total_admitted_patients, 4);

    assert_eq!(stats.attendance.total_staff, 1);
    assert!((stats.attendance.avg_attendance_rate - 100.0 / 31.0).abs() < 1e-9);

    assert_eq!(stats.lab.total_lab_tests, 2);
    assert_eq!(stats.lab.pending_lab_tests, 1);
    assert_eq!(stats.lab.lab_completion_rate, 50.0);

    assert_eq!(stats.financial.total_payroll, 100.0);
    assert_eq!(stats.financial.avg_revenue_per_patient, 125.0);
    assert_eq!(stats.financial.profit_margin, 80.0);
}

#[test]
fn test_refresh_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    seed_clinic(&db);

    let dashboard = KpiDashboard::new(&db);
    let snapshot = dashboard.create_snapshot("March", march()).unwrap();

    let first = dashboard.refresh(snapshot.id).unwrap();
    let second = dashboard.refresh(snapshot.id).unwrap();
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_refresh_replaces_every_field() {
    let db = Database::open_in_memory().unwrap();
    seed_clinic(&db);

    let dashboard = KpiDashboard::new(&db);
    let snapshot = dashboard.create_snapshot("March", march()).unwrap();
    dashboard.refresh(snapshot.id).unwrap();

    // A quiet day far from any activity
    let quiet = dashboard
        .update_range(snapshot.id, DateRange::day(date(2023, 6, 1)))
        .unwrap();

    let mut expected = KpiStats::default();
    expected.doctor.total_active_doctors = 2;
    expected.attendance.total_staff = 1;
    expected.occupancy.ward_occupancy_rate = 40.0;
    expected.occupancy.total_admitted_patients = 4;
    assert_eq!(quiet.stats, expected);
}

#[test]
fn test_empty_clinic_default_dashboard() {
    let db = Database::open_in_memory().unwrap();
    let dashboard = KpiDashboard::new(&db);

    let snapshot = dashboard.get_or_create_default_on(date(2024, 3, 15)).unwrap();
    assert!(snapshot.is_refreshed());
    assert_eq!(snapshot.stats, KpiStats::default());

    let refreshed = dashboard.refresh(snapshot.id).unwrap();
    assert_eq!(refreshed.stats, KpiStats::default());
    assert!(refreshed.stats.doctor.most_booked_doctor.is_none());
}

#[test]
fn test_errors() {
    let db = Database::open_in_memory().unwrap();
    let dashboard = KpiDashboard::new(&db);

    assert!(matches!(
        dashboard.refresh(7),
        Err(KpiError::SnapshotNotFound(7))
    ));
    assert!(matches!(
        dashboard.create_snapshot("Backwards", DateRange::new(date(2024, 3, 2), date(2024, 3, 1))),
        Err(KpiError::InvalidRange { .. })
    ));
}

#[test]
fn test_export_matches_refresh() {
    let db = Database::open_in_memory().unwrap();
    seed_clinic(&db);

    let dashboard = KpiDashboard::new(&db);
    let snapshot = dashboard.create_snapshot("March", march()).unwrap();
    dashboard.refresh(snapshot.id).unwrap();

    let export = dashboard.export(snapshot.id).unwrap();
    assert_eq!(export.report.dashboard_name, "March");
    assert_eq!(export.report.date_from, "2024-03-01");
    assert_eq!(export.report.appointment_stats.completion_rate, 40.0);
    assert_eq!(
        export.report.doctor_stats.most_booked_doctor.as_deref(),
        Some("Dr. Akter")
    );
    assert!(export.metadata.refreshed_at.is_some());
    assert!(export.verify_checksum().unwrap());

    let data = dashboard.dashboard_data(snapshot.id).unwrap();
    assert_eq!(data.patient_growth, 66.67);
    assert_eq!(data.most_booked_doctor, "Dr. Akter");
}

#[test]
fn test_ffi_round_trip() {
    let core = open_database_in_memory().unwrap();

    let doctor = core.add_doctor("Dr. Akter".into(), "medicine".into()).unwrap();
    let patient = core
        .add_patient("Karim".into(), Some("2024-03-02".into()))
        .unwrap();
    core.add_appointment(patient, doctor, "2024-03-05".into(), "done".into(), 300.0)
        .unwrap();
    let ward = core.add_bed_unit("ward".into(), "W-1".into(), 4).unwrap();
    assert!(core.admit_patient(patient, "ward".into(), ward).unwrap());

    let snapshot = core
        .create_snapshot("March".into(), "2024-03-01".into(), "2024-03-31".into())
        .unwrap();
    let refreshed = core.refresh(snapshot.id).unwrap();

    assert_eq!(refreshed.date_from, "2024-03-01");
    assert_eq!(refreshed.stats.new_patients, 1);
    assert_eq!(refreshed.stats.total_revenue, 300.0);
    assert_eq!(refreshed.stats.ward_occupancy_rate, 25.0);
    assert_eq!(refreshed.stats.most_booked_doctor_id, Some(doctor));

    let json = core.export_json(snapshot.id).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["revenue_stats"]["total_revenue"], 300.0);
    assert_eq!(core.export_file_name(), EXPORT_FILE_NAME);

    let csv = core.export_csv(snapshot.id).unwrap();
    assert!(csv.starts_with("category,metric,value\n"));
}

#[test]
fn test_ffi_refresh_near_earliest_date() {
    let core = open_database_in_memory().unwrap();

    let day = |offset| {
        NaiveDate::MIN
            .checked_add_days(Days::new(offset))
            .unwrap()
            .format("%Y-%m-%d")
            .to_string()
    };
    let snapshot = core
        .create_snapshot("Earliest".into(), day(4), day(9))
        .unwrap();
    let refreshed = core.refresh(snapshot.id).unwrap();
    assert_eq!(refreshed.stats.total_revenue, 0.0);
    assert_eq!(refreshed.stats.revenue_growth, 0.0);

    // The shared handle stays usable afterwards
    let default = core.get_or_create_default_snapshot().unwrap();
    assert_ne!(default.id, snapshot.id);
}

#[test]
fn test_ffi_input_errors() {
    let core = open_database_in_memory().unwrap();

    assert!(matches!(
        core.add_patient("Karim".into(), Some("03/02/2024".into())),
        Err(ClinicKpiError::InvalidInput(_))
    ));
    assert!(matches!(
        core.add_bed_unit("suite".into(), "S-1".into(), 2),
        Err(ClinicKpiError::InvalidInput(_))
    ));
    assert!(matches!(
        core.update_range(99, "2024-03-01".into(), "2024-03-31".into()),
        Err(ClinicKpiError::NotFound(_))
    ));
    assert!(matches!(
        core.create_snapshot("Backwards".into(), "2024-03-31".into(), "2024-03-01".into()),
        Err(ClinicKpiError::InvalidInput(_))
    ));
}
