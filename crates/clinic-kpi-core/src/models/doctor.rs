//! Doctor models.

use serde::{Deserialize, Serialize};

/// A doctor who can be booked for appointments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Display name
    pub name: String,
    /// Specialization (e.g., "cardiology", "pediatrics")
    pub specialization: String,
    /// Archived doctors are kept for history but not counted as active
    pub active: bool,
}

impl Doctor {
    /// Create an active doctor.
    pub fn new(name: String, specialization: String) -> Self {
        Self {
            id: 0,
            name,
            specialization,
            active: true,
        }
    }
}
