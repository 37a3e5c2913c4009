//! Payroll models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::RecordState;

/// Payroll state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PayrollState {
    Draft,
    Confirmed,
    Paid,
    Cancelled,
}

impl RecordState for PayrollState {
    fn as_str(&self) -> &'static str {
        match self {
            PayrollState::Draft => "draft",
            PayrollState::Confirmed => "confirmed",
            PayrollState::Paid => "paid",
            PayrollState::Cancelled => "cancelled",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PayrollState::Draft),
            "confirmed" => Some(PayrollState::Confirmed),
            "paid" => Some(PayrollState::Paid),
            "cancelled" => Some(PayrollState::Cancelled),
            _ => None,
        }
    }
}

/// A monthly salary payment for one employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payroll {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Employee row ID
    pub employee_id: i64,
    /// Date the salary was (or will be) paid
    pub payment_date: NaiveDate,
    /// Payroll state
    pub state: PayrollState,
    /// Earnings minus deductions
    pub net_salary: f64,
}

impl Payroll {
    /// Create a draft payroll row.
    pub fn new(employee_id: i64, payment_date: NaiveDate, net_salary: f64) -> Self {
        Self {
            id: 0,
            employee_id,
            payment_date,
            state: PayrollState::Draft,
            net_salary,
        }
    }

    /// Builder-style state setter.
    pub fn with_state(mut self, state: PayrollState) -> Self {
        self.state = state;
        self
    }
}
