//! Cabin and ward models.

use serde::{Deserialize, Serialize};

/// Kind of in-patient bed unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Private or semi-private room
    Cabin,
    /// Shared multi-bed ward
    Ward,
}

impl UnitKind {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            UnitKind::Cabin => "cabins",
            UnitKind::Ward => "wards",
        }
    }

    /// Patient column linking a patient to a unit of this kind.
    pub fn patient_column(&self) -> &'static str {
        match self {
            UnitKind::Cabin => "cabin_id",
            UnitKind::Ward => "ward_id",
        }
    }
}

/// A cabin or ward with its bed capacity.
///
/// `occupied_beds` is owned by the storage layer: it is the number of
/// patients currently linked to the unit and is ignored on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BedUnit {
    /// Row ID - 0 until inserted
    pub id: i64,
    /// Cabin or ward
    pub kind: UnitKind,
    /// Unit number as shown on the floor plan
    pub number: String,
    /// Optional display name
    pub name: Option<String>,
    /// Total beds (at least 1)
    pub bed_capacity: i64,
    /// Patients currently linked to this unit
    pub occupied_beds: i64,
    /// Units under maintenance are inactive
    pub active: bool,
}

impl BedUnit {
    /// Create an active unit.
    pub fn new(kind: UnitKind, number: String, bed_capacity: i64) -> Self {
        Self {
            id: 0,
            kind,
            number,
            name: None,
            bed_capacity,
            occupied_beds: 0,
            active: true,
        }
    }

    /// Beds still free. Negative when over-booked.
    pub fn available_beds(&self) -> i64 {
        self.bed_capacity - self.occupied_beds
    }

    /// Occupancy of this unit in percent.
    pub fn occupancy_rate(&self) -> f64 {
        if self.bed_capacity > 0 {
            self.occupied_beds as f64 / self.bed_capacity as f64 * 100.0
        } else {
            0.0
        }
    }

    /// True when every bed is taken.
    pub fn is_full(&self) -> bool {
        self.occupied_beds >= self.bed_capacity
    }
}
