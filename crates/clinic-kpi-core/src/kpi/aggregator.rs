//! The eight KPI sub-computations.

use std::collections::BTreeMap;

use tracing::debug;

use super::rates::{growth_percent, per_unit, ratio_percent};
use super::store::RecordStore;
use super::KpiResult;
use crate::db::{
    AppointmentQuery, DateFilter, LabTestQuery, PatientQuery, PayrollQuery, StateFilter,
};
use crate::models::{
    AppointmentState, AppointmentStats, AttendanceStats, BedUnit, BookedDoctor, DateRange,
    DoctorStats, FinancialStats, KpiStats, LabStats, LabTestState, OccupancyStats, PatientStats,
    PayrollState, RevenueStats, UnitKind,
};

/// Default length of the revenue-growth baseline window, in days.
pub const DEFAULT_BASELINE_DAYS: i64 = 30;

/// Longest accepted baseline window, in days.
pub const MAX_BASELINE_DAYS: i64 = 3660;

/// Tunables for a KPI pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorSettings {
    /// Length of the window before `date_from` that revenue growth compares against
    pub baseline_days: i64,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            baseline_days: DEFAULT_BASELINE_DAYS,
        }
    }
}

/// Computes KPI statistics for a date range.
///
/// Every sub-computation only reads from the store, so each one can be called
/// on its own and repeated calls over unchanged data return identical values.
pub struct KpiAggregator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    settings: AggregatorSettings,
}

impl<'a, S: RecordStore + ?Sized> KpiAggregator<'a, S> {
    /// Create an aggregator with default settings.
    pub fn new(store: &'a S) -> Self {
        Self::with_settings(store, AggregatorSettings::default())
    }

    pub fn with_settings(store: &'a S, settings: AggregatorSettings) -> Self {
        Self { store, settings }
    }

    /// Run every sub-computation for `range`.
    ///
    /// Nothing is persisted; a storage failure in any group fails the whole pass.
    pub fn compute(&self, range: &DateRange) -> KpiResult<KpiStats> {
        let patient = self.patient_stats(range)?;
        let appointment = self.appointment_stats(range)?;
        let revenue = self.revenue_stats(range)?;
        let doctor = self.doctor_stats(range)?;
        let occupancy = self.occupancy_stats()?;
        let attendance = self.attendance_stats(range)?;
        let lab = self.lab_stats(range)?;
        let financial = self.financial_stats(range, &revenue, &patient)?;

        Ok(KpiStats {
            patient,
            appointment,
            revenue,
            doctor,
            occupancy,
            attendance,
            lab,
            financial,
        })
    }

    /// Registered patients up to `date_to`, new registrations in range and
    /// growth against the population before `date_from`.
    pub fn patient_stats(&self, range: &DateRange) -> KpiResult<PatientStats> {
        let total_patients = self.count_patients(DateFilter::OnOrBefore(range.date_to))?;
        let new_patients = self.count_patients(DateFilter::from(*range))?;
        let previous_total = self.count_patients(DateFilter::Before(range.date_from))?;

        let patient_growth = growth_percent(total_patients as f64, previous_total as f64);

        debug!(total_patients, new_patients, previous_total, "patient stats");
        Ok(PatientStats {
            total_patients,
            new_patients,
            patient_growth,
        })
    }

    pub fn appointment_stats(&self, range: &DateRange) -> KpiResult<AppointmentStats> {
        let appointments = self.store.find_appointments(&AppointmentQuery {
            date: DateFilter::from(*range),
            ..Default::default()
        })?;

        let total_appointments = appointments.len() as i64;
        let completed_appointments = appointments.iter().filter(|a| a.is_done()).count() as i64;
        let cancelled_appointments =
            appointments.iter().filter(|a| a.is_cancelled()).count() as i64;
        let completion_rate =
            ratio_percent(completed_appointments as f64, total_appointments as f64);

        debug!(total_appointments, completed_appointments, cancelled_appointments, "appointment stats");
        Ok(AppointmentStats {
            total_appointments,
            completed_appointments,
            cancelled_appointments,
            completion_rate,
        })
    }

    /// Done-appointment and completed-lab revenue, with growth measured
    /// against the consultation revenue of the preceding baseline window.
    pub fn revenue_stats(&self, range: &DateRange) -> KpiResult<RevenueStats> {
        let consultation_revenue = self.consultation_revenue(DateFilter::from(*range))?;

        let lab_test_revenue: f64 = self
            .store
            .find_lab_tests(&LabTestQuery {
                date: DateFilter::from(*range),
                state: StateFilter::only(LabTestState::Completed),
            })?
            .iter()
            .map(|t| t.test_cost)
            .sum();

        let total_revenue = consultation_revenue + lab_test_revenue;

        let baseline_revenue = match range.preceding(self.settings.baseline_days) {
            Some(window) => self.consultation_revenue(DateFilter::from(window))?,
            None => 0.0,
        };
        let revenue_growth = growth_percent(total_revenue, baseline_revenue);

        debug!(total_revenue, baseline_revenue, "revenue stats");
        Ok(RevenueStats {
            total_revenue,
            consultation_revenue,
            lab_test_revenue,
            revenue_growth,
        })
    }

    pub fn doctor_stats(&self, range: &DateRange) -> KpiResult<DoctorStats> {
        let total_active_doctors = self.store.find_doctors(Some(true))?.len() as i64;

        let appointments = self.store.find_appointments(&AppointmentQuery {
            date: DateFilter::from(*range),
            ..Default::default()
        })?;

        let mut per_doctor: BTreeMap<i64, i64> = BTreeMap::new();
        for appointment in &appointments {
            *per_doctor.entry(appointment.doctor_id).or_default() += 1;
        }

        // Ascending ids with a strict comparison: ties keep the lowest id.
        let mut top: Option<(i64, i64)> = None;
        for (&doctor_id, &count) in &per_doctor {
            if top.map_or(true, |(_, best)| count > best) {
                top = Some((doctor_id, count));
            }
        }

        let most_booked_doctor = match top {
            Some((doctor_id, appointment_count)) => {
                let name = self
                    .store
                    .get_doctor(doctor_id)?
                    .map(|d| d.name)
                    .unwrap_or_default();
                Some(BookedDoctor {
                    doctor_id,
                    name,
                    appointment_count,
                })
            }
            None => None,
        };

        let avg_consultation_per_doctor =
            per_unit(appointments.len() as f64, total_active_doctors);

        debug!(total_active_doctors, booked_doctors = per_doctor.len(), "doctor stats");
        Ok(DoctorStats {
            most_booked_doctor,
            total_active_doctors,
            avg_consultation_per_doctor,
        })
    }

    /// Current bed occupancy of active cabins and wards. Range independent.
    pub fn occupancy_stats(&self) -> KpiResult<OccupancyStats> {
        let cabins = self.store.find_bed_units(UnitKind::Cabin, Some(true))?;
        let wards = self.store.find_bed_units(UnitKind::Ward, Some(true))?;

        let total_admitted_patients = self
            .store
            .find_patients(&PatientQuery {
                admitted: Some(true),
                ..Default::default()
            })?
            .len() as i64;

        let stats = OccupancyStats {
            cabin_occupancy_rate: pooled_occupancy(&cabins),
            ward_occupancy_rate: pooled_occupancy(&wards),
            total_admitted_patients,
        };

        debug!(cabins = cabins.len(), wards = wards.len(), total_admitted_patients, "occupancy stats");
        Ok(stats)
    }

    pub fn attendance_stats(&self, range: &DateRange) -> KpiResult<AttendanceStats> {
        let total_staff = self.store.find_employees(Some(true))?.len() as i64;
        let records = self.store.find_attendance(&DateFilter::from(*range))?;

        let (avg_attendance_rate, total_overtime_hours) = if records.is_empty() {
            (0.0, 0.0)
        } else {
            let attended = records.iter().filter(|r| r.status.is_attended()).count();
            let expected = total_staff * range.days().max(0);
            (
                ratio_percent(attended as f64, expected as f64),
                records.iter().map(|r| r.overtime_hours).sum(),
            )
        };

        debug!(total_staff, records = records.len(), "attendance stats");
        Ok(AttendanceStats {
            total_staff,
            avg_attendance_rate,
            total_overtime_hours,
        })
    }

    pub fn lab_stats(&self, range: &DateRange) -> KpiResult<LabStats> {
        let tests = self.store.find_lab_tests(&LabTestQuery {
            date: DateFilter::from(*range),
            ..Default::default()
        })?;

        let total_lab_tests = tests.len() as i64;
        let completed_lab_tests = tests
            .iter()
            .filter(|t| t.state == LabTestState::Completed)
            .count() as i64;
        let pending_lab_tests = tests.iter().filter(|t| t.state.is_pending()).count() as i64;
        let lab_completion_rate = ratio_percent(completed_lab_tests as f64, total_lab_tests as f64);

        debug!(total_lab_tests, completed_lab_tests, pending_lab_tests, "lab stats");
        Ok(LabStats {
            total_lab_tests,
            completed_lab_tests,
            pending_lab_tests,
            lab_completion_rate,
        })
    }

    /// Payroll cost and derived margins.
    ///
    /// Takes the revenue and patient groups of the same pass rather than
    /// recomputing them.
    pub fn financial_stats(
        &self,
        range: &DateRange,
        revenue: &RevenueStats,
        patients: &PatientStats,
    ) -> KpiResult<FinancialStats> {
        let total_payroll: f64 = self
            .store
            .find_payrolls(&PayrollQuery {
                payment_date: DateFilter::from(*range),
                state: StateFilter::only(PayrollState::Paid),
            })?
            .iter()
            .map(|p| p.net_salary)
            .sum();

        let avg_revenue_per_patient = per_unit(revenue.total_revenue, patients.new_patients);
        let profit_margin = ratio_percent(
            revenue.total_revenue - total_payroll,
            revenue.total_revenue,
        );

        debug!(total_payroll, "financial stats");
        Ok(FinancialStats {
            total_payroll,
            avg_revenue_per_patient,
            profit_margin,
        })
    }

    fn count_patients(&self, created: DateFilter) -> KpiResult<i64> {
        let patients = self.store.find_patients(&PatientQuery {
            created,
            ..Default::default()
        })?;
        Ok(patients.len() as i64)
    }

    fn consultation_revenue(&self, date: DateFilter) -> KpiResult<f64> {
        let done = self.store.find_appointments(&AppointmentQuery {
            date,
            state: StateFilter::only(AppointmentState::Done),
        })?;
        Ok(done.iter().map(|a| a.total_amount).sum())
    }
}

/// Σ occupied / Σ capacity over `units`, as a percentage.
fn pooled_occupancy(units: &[BedUnit]) -> f64 {
    let occupied: i64 = units.iter().map(|u| u.occupied_beds).sum();
    let capacity: i64 = units.iter().map(|u| u.bed_capacity).sum();
    ratio_percent(occupied as f64, capacity as f64)
}
