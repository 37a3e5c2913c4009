//! Appointment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::RecordState;

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentState {
    Draft,
    Confirmed,
    InProgress,
    /// Consultation finished; counts as completed and as revenue
    Done,
    Cancelled,
}

impl RecordState for AppointmentState {
    fn as_str(&self) -> &'static str {
        match self {
            AppointmentState::Draft => "draft",
            AppointmentState::Confirmed => "confirmed",
            AppointmentState::InProgress => "in_progress",
            AppointmentState::Done => "done",
            AppointmentState::Cancelled => "cancelled",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AppointmentState::Draft),
            "confirmed" => Some(AppointmentState::Confirmed),
            "in_progress" => Some(AppointmentState::InProgress),
            "done" => Some(AppointmentState::Done),
            "cancelled" => Some(AppointmentState::Cancelled),
            _ => None,
        }
    }
}

/// A booked consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Patient row ID
    pub patient_id: i64,
    /// Doctor row ID
    pub doctor_id: i64,
    /// Scheduled date
    pub appointment_date: NaiveDate,
    /// Lifecycle state
    pub state: AppointmentState,
    /// Consultation fee plus additional charges
    pub total_amount: f64,
}

impl Appointment {
    /// Create a draft appointment.
    pub fn new(patient_id: i64, doctor_id: i64, appointment_date: NaiveDate) -> Self {
        Self {
            id: 0,
            patient_id,
            doctor_id,
            appointment_date,
            state: AppointmentState::Draft,
            total_amount: 0.0,
        }
    }

    /// Builder-style state setter.
    pub fn with_state(mut self, state: AppointmentState) -> Self {
        self.state = state;
        self
    }

    /// Builder-style amount setter.
    pub fn with_amount(mut self, total_amount: f64) -> Self {
        self.total_amount = total_amount;
        self
    }

    pub fn is_done(&self) -> bool {
        self.state == AppointmentState::Done
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == AppointmentState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_storage_names() {
        for state in [
            AppointmentState::Draft,
            AppointmentState::Confirmed,
            AppointmentState::InProgress,
            AppointmentState::Done,
            AppointmentState::Cancelled,
        ] {
            assert_eq!(AppointmentState::parse(state.as_str()), Some(state));
        }
        assert_eq!(AppointmentState::parse("archived"), None);
    }

    #[test]
    fn test_state_serde_matches_storage() {
        let json = serde_json::to_string(&AppointmentState::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let appt = Appointment::new(1, 2, date)
            .with_state(AppointmentState::Done)
            .with_amount(500.0);
        assert!(appt.is_done());
        assert!(!appt.is_cancelled());
        assert_eq!(appt.total_amount, 500.0);
    }
}
