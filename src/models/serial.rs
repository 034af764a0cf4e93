use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use super::{SerialStatus, TargetType};

/// Provenance snapshot captured at the moment a serial is assigned.
///
/// Cleared wholesale on unassignment. `target_name` falls back to the target
/// id when the caller did not supply a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDetails {
    pub target_id: String,
    pub target_type: TargetType,
    pub target_name: String,
    pub assigned_at: DateTime<Utc>,
    pub is_temporary: bool,
}

/// Declared expected composition of an assembly serial, independent of the
/// actual `child_serials` links. Purely descriptive planning data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildComponent {
    pub buyer_part_number: String,
    pub quantity: u32,
}

/// One physically identifiable unit of inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Serial {
    pub id: Uuid,
    /// Human-facing code. Unique within a buyer part number (enforced at
    /// single-create and import time; bulk numbering collisions are the
    /// caller's responsibility).
    pub serial_number: String,
    /// Immutable after creation; must reference a registry entry.
    pub buyer_part_number: String,
    pub status: SerialStatus,
    pub assigned_to: Option<String>,
    pub assigned_to_type: Option<TargetType>,
    pub assignment_details: Option<AssignmentDetails>,
    /// Free-form attributes set at creation, never touched by the engine.
    pub custom_attributes: BTreeMap<String, String>,
    /// Serial ids this serial contains (assembly linkage).
    pub child_serials: HashSet<Uuid>,
    /// Back-reference to at most one containing serial. Identity only.
    pub parent_serial: Option<Uuid>,
    pub child_components: Vec<ChildComponent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Serial {
    /// Creates a fresh unassigned serial with both timestamps set to now.
    pub fn new(
        serial_number: impl Into<String>,
        buyer_part_number: impl Into<String>,
        custom_attributes: BTreeMap<String, String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            serial_number: serial_number.into(),
            buyer_part_number: buyer_part_number.into(),
            status: SerialStatus::Unassigned,
            assigned_to: None,
            assigned_to_type: None,
            assignment_details: None,
            custom_attributes,
            child_serials: HashSet::new(),
            parent_serial: None,
            child_components: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this serial is currently bound to the given target.
    pub fn is_assigned_to(&self, target_id: &str, target_type: TargetType) -> bool {
        self.assigned_to.as_deref() == Some(target_id)
            && self.assigned_to_type == Some(target_type)
    }

    /// Binds the serial to a target, stamping provenance.
    pub fn assign(&mut self, details: AssignmentDetails) {
        self.status = if details.is_temporary {
            SerialStatus::Reserved
        } else {
            SerialStatus::Assigned
        };
        self.assigned_to = Some(details.target_id.clone());
        self.assigned_to_type = Some(details.target_type);
        self.assignment_details = Some(details);
        self.updated_at = Utc::now();
    }

    /// Resets the serial to unassigned, clearing target and provenance.
    /// Idempotent: safe on an already-unassigned serial.
    pub fn unassign(&mut self) {
        self.status = SerialStatus::Unassigned;
        self.assigned_to = None;
        self.assigned_to_type = None;
        self.assignment_details = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(target: &str) -> AssignmentDetails {
        AssignmentDetails {
            target_id: target.to_string(),
            target_type: TargetType::Lot,
            target_name: target.to_string(),
            assigned_at: Utc::now(),
            is_temporary: false,
        }
    }

    #[test]
    fn new_serial_starts_unassigned_with_no_target_fields() {
        let s = Serial::new("SN1", "BPN-1", BTreeMap::new());
        assert_eq!(s.status, SerialStatus::Unassigned);
        assert!(s.assigned_to.is_none());
        assert!(s.assigned_to_type.is_none());
        assert!(s.assignment_details.is_none());
        assert_eq!(s.created_at, s.updated_at);
    }

    #[test]
    fn assign_unassign_round_trip_leaves_no_residue() {
        let mut s = Serial::new("SN1", "BPN-1", BTreeMap::new());
        s.assign(details("lot-1"));
        assert_eq!(s.status, SerialStatus::Assigned);
        assert!(s.is_assigned_to("lot-1", TargetType::Lot));

        s.unassign();
        assert_eq!(s.status, SerialStatus::Unassigned);
        assert!(s.assigned_to.is_none());
        assert!(s.assigned_to_type.is_none());
        assert!(s.assignment_details.is_none());
    }

    #[test]
    fn temporary_assignment_reserves() {
        let mut s = Serial::new("SN1", "BPN-1", BTreeMap::new());
        let mut d = details("lot-1");
        d.is_temporary = true;
        s.assign(d);
        assert_eq!(s.status, SerialStatus::Reserved);
    }
}
