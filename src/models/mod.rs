use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod hierarchy;
pub mod part_number;
pub mod serial;

pub use hierarchy::{AsnHierarchy, AsnItem, AsnLot, PackingUnit, PackingUnitType};
pub use part_number::PartNumber;
pub use serial::{AssignmentDetails, ChildComponent, Serial};

/// Lifecycle status of a serialized inventory unit.
///
/// `unassigned → {assigned, reserved} → unassigned` is the only cycle the
/// assignment engine drives. `Shipped` is an externally-driven terminal
/// marker; no engine operation produces it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SerialStatus {
    Unassigned,
    Assigned,
    Reserved,
    Shipped,
}

/// Kind of assignment target a serial can be bound to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetType {
    Item,
    Lot,
    Package,
}
