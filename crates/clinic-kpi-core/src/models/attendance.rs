//! Employee and attendance models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::RecordState;

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Full name
    pub name: String,
    /// Role (e.g., "nurse", "receptionist", "technician")
    pub employee_type: String,
    /// Departed staff are inactive
    pub active: bool,
}

impl Employee {
    /// Create an active employee.
    pub fn new(name: String, employee_type: String) -> Self {
        Self {
            id: 0,
            name,
            employee_type,
            active: true,
        }
    }
}

/// Daily attendance status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Late,
}

impl AttendanceStatus {
    /// Late arrivals still count as attended.
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl RecordState for AttendanceStatus {
    fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Late => "late",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "half_day" => Some(AttendanceStatus::HalfDay),
            "late" => Some(AttendanceStatus::Late),
            _ => None,
        }
    }
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attendance {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Employee row ID
    pub employee_id: i64,
    /// Day of attendance
    pub attendance_date: NaiveDate,
    /// Attendance status
    pub status: AttendanceStatus,
    /// Hours worked beyond the expected shift
    pub overtime_hours: f64,
}

impl Attendance {
    /// Create an attendance row without overtime.
    pub fn new(employee_id: i64, attendance_date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: 0,
            employee_id,
            attendance_date,
            status,
            overtime_hours: 0.0,
        }
    }
}
