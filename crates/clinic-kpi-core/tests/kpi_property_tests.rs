//! Property tests for the KPI aggregator over an in-memory record store.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use clinic_kpi_core::db::{
    AppointmentQuery, DateFilter, DbResult, LabTestQuery, PatientQuery, PayrollQuery,
};
use clinic_kpi_core::kpi::{growth_percent, ratio_percent, KpiAggregator, RecordStore};
use clinic_kpi_core::models::{
    Appointment, AppointmentState, Attendance, AttendanceStatus, BedUnit, DateRange, Doctor,
    Employee, LabTest, LabTestState, Patient, Payroll, PayrollState, UnitKind,
};

/// Vec-backed record store.
#[derive(Debug, Default)]
struct MemoryStore {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    doctors: Vec<Doctor>,
    units: Vec<BedUnit>,
    lab_tests: Vec<LabTest>,
    payrolls: Vec<Payroll>,
    employees: Vec<Employee>,
    attendance: Vec<Attendance>,
}

fn flag_matches(flag: Option<bool>, value: bool) -> bool {
    flag.map_or(true, |f| f == value)
}

impl RecordStore for MemoryStore {
    fn find_patients(&self, query: &PatientQuery) -> DbResult<Vec<Patient>> {
        Ok(self
            .patients
            .iter()
            .filter(|p| p.created_on().map_or(false, |d| query.created.matches(d)))
            .filter(|p| flag_matches(query.admitted, p.is_admitted))
            .cloned()
            .collect())
    }

    fn find_appointments(&self, query: &AppointmentQuery) -> DbResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| query.date.matches(a.appointment_date) && query.state.matches(&a.state))
            .cloned()
            .collect())
    }

    fn find_doctors(&self, active: Option<bool>) -> DbResult<Vec<Doctor>> {
        Ok(self
            .doctors
            .iter()
            .filter(|d| flag_matches(active, d.active))
            .cloned()
            .collect())
    }

    fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>> {
        Ok(self.doctors.iter().find(|d| d.id == id).cloned())
    }

    fn find_bed_units(&self, kind: UnitKind, active: Option<bool>) -> DbResult<Vec<BedUnit>> {
        Ok(self
            .units
            .iter()
            .filter(|u| u.kind == kind && flag_matches(active, u.active))
            .cloned()
            .collect())
    }

    fn find_lab_tests(&self, query: &LabTestQuery) -> DbResult<Vec<LabTest>> {
        Ok(self
            .lab_tests
            .iter()
            .filter(|t| query.date.matches(t.test_date) && query.state.matches(&t.state))
            .cloned()
            .collect())
    }

    fn find_payrolls(&self, query: &PayrollQuery) -> DbResult<Vec<Payroll>> {
        Ok(self
            .payrolls
            .iter()
            .filter(|p| query.payment_date.matches(p.payment_date) && query.state.matches(&p.state))
            .cloned()
            .collect())
    }

    fn find_employees(&self, active: Option<bool>) -> DbResult<Vec<Employee>> {
        Ok(self
            .employees
            .iter()
            .filter(|e| flag_matches(active, e.active))
            .cloned()
            .collect())
    }

    fn find_attendance(&self, date: &DateFilter) -> DbResult<Vec<Attendance>> {
        Ok(self
            .attendance
            .iter()
            .filter(|a| date.matches(a.attendance_date))
            .cloned()
            .collect())
    }
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base_date() + Duration::days(offset)
}

const APPOINTMENT_STATES: [AppointmentState; 5] = [
    AppointmentState::Draft,
    AppointmentState::Confirmed,
    AppointmentState::InProgress,
    AppointmentState::Done,
    AppointmentState::Cancelled,
];

const LAB_STATES: [LabTestState; 5] = [
    LabTestState::Draft,
    LabTestState::SampleCollected,
    LabTestState::InProgress,
    LabTestState::Completed,
    LabTestState::Cancelled,
];

const PAYROLL_STATES: [PayrollState; 4] = [
    PayrollState::Draft,
    PayrollState::Confirmed,
    PayrollState::Paid,
    PayrollState::Cancelled,
];

const ATTENDANCE_STATUSES: [AttendanceStatus; 4] = [
    AttendanceStatus::Present,
    AttendanceStatus::Absent,
    AttendanceStatus::HalfDay,
    AttendanceStatus::Late,
];

prop_compose! {
    /// A clinic with up to a few dozen records spread over 120 days.
    fn arb_store()(
        patient_days in prop::collection::vec((0i64..120, any::<bool>()), 0..30),
        doctor_flags in prop::collection::vec(any::<bool>(), 0..5),
        appointments in prop::collection::vec((0i64..120, 0usize..5, 0usize..5, 0.0f64..1000.0), 0..40),
        units in prop::collection::vec((any::<bool>(), 1i64..12, any::<bool>()), 0..6),
        lab_tests in prop::collection::vec((0i64..120, 0usize..5, 0.0f64..500.0), 0..30),
        payrolls in prop::collection::vec((0i64..120, 0usize..4, 0.0f64..3000.0), 0..20),
        employee_flags in prop::collection::vec(any::<bool>(), 1..5),
        attendance in prop::collection::vec((0i64..120, 0usize..4, 0.0f64..4.0), 0..40),
    ) -> MemoryStore {
        let mut store = MemoryStore::default();

        for (i, (offset, admitted)) in patient_days.into_iter().enumerate() {
            let mut patient = Patient::registered_on(format!("P{}", i), day(offset));
            patient.id = i as i64 + 1;
            patient.is_admitted = admitted;
            store.patients.push(patient);
        }

        for (i, active) in doctor_flags.into_iter().enumerate() {
            let mut doctor = Doctor::new(format!("Dr. {}", i), "general".into());
            doctor.id = i as i64 + 1;
            doctor.active = active;
            store.doctors.push(doctor);
        }

        if !store.doctors.is_empty() {
            for (i, (offset, doctor, state, amount)) in appointments.into_iter().enumerate() {
                let doctor_id = store.doctors[doctor % store.doctors.len()].id;
                let mut appointment = Appointment::new(1, doctor_id, day(offset))
                    .with_state(APPOINTMENT_STATES[state])
                    .with_amount(amount);
                appointment.id = i as i64 + 1;
                store.appointments.push(appointment);
            }
        }

        for (i, (is_ward, capacity, active)) in units.into_iter().enumerate() {
            let kind = if is_ward { UnitKind::Ward } else { UnitKind::Cabin };
            let mut unit = BedUnit::new(kind, format!("U-{}", i), capacity);
            unit.id = i as i64 + 1;
            unit.active = active;
            // Occupancy never exceeds capacity for linked patients
            unit.occupied_beds = (i as i64) % (capacity + 1);
            store.units.push(unit);
        }

        for (i, (offset, state, cost)) in lab_tests.into_iter().enumerate() {
            let mut test = LabTest::new(1, day(offset), cost).with_state(LAB_STATES[state]);
            test.id = i as i64 + 1;
            store.lab_tests.push(test);
        }

        for (i, (offset, state, salary)) in payrolls.into_iter().enumerate() {
            let mut payroll = Payroll::new(1, day(offset), salary).with_state(PAYROLL_STATES[state]);
            payroll.id = i as i64 + 1;
            store.payrolls.push(payroll);
        }

        for (i, active) in employee_flags.into_iter().enumerate() {
            let mut employee = Employee::new(format!("E{}", i), "staff".into());
            employee.id = i as i64 + 1;
            employee.active = active;
            store.employees.push(employee);
        }

        // One row per (active employee, date)
        let active_ids: Vec<i64> = store.employees.iter().filter(|e| e.active).map(|e| e.id).collect();
        if !active_ids.is_empty() {
            for (i, (offset, status, overtime)) in attendance.into_iter().enumerate() {
                let employee_id = active_ids[i % active_ids.len()];
                let date = day(offset);
                if store.attendance.iter().any(|a| a.employee_id == employee_id && a.attendance_date == date) {
                    continue;
                }
                let mut row = Attendance::new(employee_id, date, ATTENDANCE_STATUSES[status]);
                row.id = i as i64 + 1;
                row.overtime_hours = overtime;
                store.attendance.push(row);
            }
        }

        store
    }
}

prop_compose! {
    fn arb_range()(start in 0i64..120, len in 0i64..60) -> DateRange {
        DateRange::new(day(start), day(start + len))
    }
}

fn in_percent_bounds(value: f64) -> bool {
    (0.0..=100.0 + 1e-9).contains(&value)
}

proptest! {
    #[test]
    fn prop_rates_stay_in_bounds(store in arb_store(), range in arb_range()) {
        let stats = KpiAggregator::new(&store).compute(&range).unwrap();

        prop_assert!(in_percent_bounds(stats.appointment.completion_rate));
        prop_assert!(in_percent_bounds(stats.lab.lab_completion_rate));
        prop_assert!(in_percent_bounds(stats.occupancy.cabin_occupancy_rate));
        prop_assert!(in_percent_bounds(stats.occupancy.ward_occupancy_rate));
        prop_assert!(in_percent_bounds(stats.attendance.avg_attendance_rate));
    }

    #[test]
    fn prop_counts_are_consistent(store in arb_store(), range in arb_range()) {
        let stats = KpiAggregator::new(&store).compute(&range).unwrap();

        prop_assert!(stats.patient.new_patients <= stats.patient.total_patients);
        prop_assert!(
            stats.appointment.completed_appointments + stats.appointment.cancelled_appointments
                <= stats.appointment.total_appointments
        );
        prop_assert!(
            stats.lab.completed_lab_tests + stats.lab.pending_lab_tests <= stats.lab.total_lab_tests
        );
        let revenue = &stats.revenue;
        prop_assert!(
            (revenue.total_revenue - revenue.consultation_revenue - revenue.lab_test_revenue).abs() < 1e-6
        );
        if let Some(top) = &stats.doctor.most_booked_doctor {
            prop_assert!(top.appointment_count <= stats.appointment.total_appointments);
            prop_assert!(top.appointment_count > 0);
        }
    }

    #[test]
    fn prop_compute_is_idempotent(store in arb_store(), range in arb_range()) {
        let aggregator = KpiAggregator::new(&store);
        let first = aggregator.compute(&range).unwrap();
        let second = aggregator.compute(&range).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_no_revenue_means_no_margin(store in arb_store(), range in arb_range()) {
        let stats = KpiAggregator::new(&store).compute(&range).unwrap();
        if stats.revenue.total_revenue <= 0.0 {
            prop_assert_eq!(stats.financial.profit_margin, 0.0);
        }
        if stats.patient.new_patients == 0 {
            prop_assert_eq!(stats.financial.avg_revenue_per_patient, 0.0);
        }
    }

    #[test]
    fn prop_ratio_percent_bounded(whole in 0u32..10_000, part_share in 0.0f64..=1.0) {
        let part = (whole as f64 * part_share).floor();
        prop_assert!(in_percent_bounds(ratio_percent(part, whole as f64)));
    }

    #[test]
    fn prop_growth_zero_baseline(current in 0.0f64..1_000_000.0) {
        let growth = growth_percent(current, 0.0);
        if current > 0.0 {
            prop_assert_eq!(growth, 100.0);
        } else {
            prop_assert_eq!(growth, 0.0);
        }
    }

    #[test]
    fn prop_growth_sign_follows_change(current in 0.0f64..10_000.0, baseline in 0.01f64..10_000.0) {
        let growth = growth_percent(current, baseline);
        prop_assert_eq!(growth > 0.0, current > baseline);
        prop_assert!(growth >= -100.0);
    }
}
