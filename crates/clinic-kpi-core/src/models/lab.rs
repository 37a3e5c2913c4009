//! Lab test models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::RecordState;

/// Lab test workflow state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LabTestState {
    Draft,
    SampleCollected,
    InProgress,
    Completed,
    Cancelled,
}

impl LabTestState {
    /// States counted as pending on the dashboard.
    pub const PENDING: [LabTestState; 3] = [
        LabTestState::Draft,
        LabTestState::SampleCollected,
        LabTestState::InProgress,
    ];

    pub fn is_pending(&self) -> bool {
        Self::PENDING.contains(self)
    }
}

impl RecordState for LabTestState {
    fn as_str(&self) -> &'static str {
        match self {
            LabTestState::Draft => "draft",
            LabTestState::SampleCollected => "sample_collected",
            LabTestState::InProgress => "in_progress",
            LabTestState::Completed => "completed",
            LabTestState::Cancelled => "cancelled",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(LabTestState::Draft),
            "sample_collected" => Some(LabTestState::SampleCollected),
            "in_progress" => Some(LabTestState::InProgress),
            "completed" => Some(LabTestState::Completed),
            "cancelled" => Some(LabTestState::Cancelled),
            _ => None,
        }
    }
}

/// A lab test ordered for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Patient row ID
    pub patient_id: i64,
    /// Date the test was taken
    pub test_date: NaiveDate,
    /// Workflow state
    pub state: LabTestState,
    /// Price charged for the test
    pub test_cost: f64,
}

impl LabTest {
    /// Create a draft lab test.
    pub fn new(patient_id: i64, test_date: NaiveDate, test_cost: f64) -> Self {
        Self {
            id: 0,
            patient_id,
            test_date,
            state: LabTestState::Draft,
            test_cost,
        }
    }

    /// Builder-style state setter.
    pub fn with_state(mut self, state: LabTestState) -> Self {
        self.state = state;
        self
    }
}
