//! Patient models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A patient record as seen by the KPI dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Patient name
    pub name: String,
    /// Whether the patient is currently admitted
    pub is_admitted: bool,
    /// Cabin the patient currently occupies
    pub cabin_id: Option<i64>,
    /// Ward the patient currently occupies
    pub ward_id: Option<i64>,
    /// Registration timestamp (RFC 3339)
    pub created_at: String,
}

impl Patient {
    /// Create a new, not-yet-admitted patient registered now.
    pub fn new(name: String) -> Self {
        Self {
            id: 0,
            name,
            is_admitted: false,
            cabin_id: None,
            ward_id: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Create a patient with a registration date (midnight UTC).
    pub fn registered_on(name: String, date: NaiveDate) -> Self {
        let created_at = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        Self {
            created_at: created_at.to_rfc3339(),
            ..Self::new(name)
        }
    }

    /// Calendar date the patient was registered, if the timestamp parses.
    pub fn created_on(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    }
}
