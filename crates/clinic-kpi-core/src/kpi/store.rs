//! Read-only query seam over the record collections.

use crate::db::{
    AppointmentQuery, Database, DateFilter, DbResult, LabTestQuery, PatientQuery, PayrollQuery,
};
use crate::models::{
    Appointment, Attendance, BedUnit, Doctor, Employee, LabTest, Patient, Payroll, UnitKind,
};

/// The collections the KPI aggregator reads from.
///
/// Every `find_*` returns records ordered by ID. Storage failures are
/// returned as-is; implementations do not retry.
pub trait RecordStore {
    fn find_patients(&self, query: &PatientQuery) -> DbResult<Vec<Patient>>;

    fn find_appointments(&self, query: &AppointmentQuery) -> DbResult<Vec<Appointment>>;

    fn find_doctors(&self, active: Option<bool>) -> DbResult<Vec<Doctor>>;

    fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>>;

    /// Cabins or wards with `occupied_beds` derived from linked patients.
    fn find_bed_units(&self, kind: UnitKind, active: Option<bool>) -> DbResult<Vec<BedUnit>>;

    fn find_lab_tests(&self, query: &LabTestQuery) -> DbResult<Vec<LabTest>>;

    fn find_payrolls(&self, query: &PayrollQuery) -> DbResult<Vec<Payroll>>;

    fn find_employees(&self, active: Option<bool>) -> DbResult<Vec<Employee>>;

    fn find_attendance(&self, date: &DateFilter) -> DbResult<Vec<Attendance>>;
}

impl RecordStore for Database {
    fn find_patients(&self, query: &PatientQuery) -> DbResult<Vec<Patient>> {
        Database::find_patients(self, query)
    }

    fn find_appointments(&self, query: &AppointmentQuery) -> DbResult<Vec<Appointment>> {
        Database::find_appointments(self, query)
    }

    fn find_doctors(&self, active: Option<bool>) -> DbResult<Vec<Doctor>> {
        Database::find_doctors(self, active)
    }

    fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>> {
        Database::get_doctor(self, id)
    }

    fn find_bed_units(&self, kind: UnitKind, active: Option<bool>) -> DbResult<Vec<BedUnit>> {
        Database::find_bed_units(self, kind, active)
    }

    fn find_lab_tests(&self, query: &LabTestQuery) -> DbResult<Vec<LabTest>> {
        Database::find_lab_tests(self, query)
    }

    fn find_payrolls(&self, query: &PayrollQuery) -> DbResult<Vec<Payroll>> {
        Database::find_payrolls(self, query)
    }

    fn find_employees(&self, active: Option<bool>) -> DbResult<Vec<Employee>> {
        Database::find_employees(self, active)
    }

    fn find_attendance(&self, date: &DateFilter) -> DbResult<Vec<Attendance>> {
        Database::find_attendance(self, date)
    }
}
