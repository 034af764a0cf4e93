use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::EngineConfig,
    errors::ServiceError,
    models::{
        AsnHierarchy, AssignmentDetails, ChildComponent, PartNumber, Serial, SerialStatus,
        TargetType,
    },
};

/// Live-computed assignment statistics for a single target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProgress {
    pub assigned: u32,
    pub capacity: Option<u32>,
    pub percent: Option<f32>,
}

/// A serial excluded from an assignment batch because it is already bound to
/// a different target. Reported back to the caller, never thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedAssignment {
    pub serial_id: Uuid,
    pub serial_number: String,
    pub current_target_id: String,
    pub current_target_type: TargetType,
}

/// Result of an atomic batch assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub assigned: Vec<Uuid>,
    pub skipped: Vec<SkippedAssignment>,
}

/// Serial records plus the buyer-part-number index, kept consistent under a
/// single lock so batch operations are observed all-or-nothing.
#[derive(Debug, Default)]
struct SerialInventory {
    by_id: HashMap<Uuid, Serial>,
    by_bpn: HashMap<String, Vec<Uuid>>,
}

impl SerialInventory {
    fn insert(&mut self, serial: Serial) {
        self.by_bpn
            .entry(serial.buyer_part_number.clone())
            .or_default()
            .push(serial.id);
        self.by_id.insert(serial.id, serial);
    }

    fn number_exists(&self, buyer_part_number: &str, serial_number: &str) -> bool {
        self.by_bpn
            .get(buyer_part_number)
            .map(|ids| {
                ids.iter().any(|id| {
                    self.by_id
                        .get(id)
                        .map(|s| s.serial_number == serial_number)
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    fn assigned_to_target(&self, target_id: &str, target_type: TargetType) -> Vec<&Serial> {
        self.by_id
            .values()
            .filter(|s| s.is_assigned_to(target_id, target_type))
            .collect()
    }
}

/// The single shared mutable resource of the engine: canonical serial records,
/// the part number registry, and the read-only hierarchy catalog.
///
/// The assignment engine and the relationship tracker both operate on the same
/// `Datastore` instance; each public operation applies its entire effect under
/// one write-lock acquisition, which is the mutual-exclusion boundary that
/// keeps the capacity check and the subsequent mutation from racing in a
/// multi-threaded host.
pub struct Datastore {
    inventory: RwLock<SerialInventory>,
    part_numbers: DashMap<String, PartNumber>,
    hierarchy: AsnHierarchy,
    config: EngineConfig,
}

impl Datastore {
    /// Builds a datastore over a catalog hierarchy, seeding the part number
    /// registry from the hierarchy's items and lots.
    pub fn new(hierarchy: AsnHierarchy, config: EngineConfig) -> Self {
        let store = Self {
            inventory: RwLock::new(SerialInventory::default()),
            part_numbers: DashMap::new(),
            hierarchy,
            config,
        };
        store.seed_registry_from_hierarchy();
        store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> &AsnHierarchy {
        &self.hierarchy
    }

    // ---- Part number registry -------------------------------------------

    fn seed_registry_from_hierarchy(&self) {
        for item in &self.hierarchy.items {
            if !item.buyer_part_number.is_empty() {
                self.part_numbers
                    .entry(item.buyer_part_number.clone())
                    .or_insert_with(|| {
                        PartNumber::new(
                            &item.buyer_part_number,
                            &item.name,
                            item.description.clone(),
                        )
                    });
            }
            for lot in &item.lots {
                if !lot.buyer_part_number.is_empty() {
                    self.part_numbers
                        .entry(lot.buyer_part_number.clone())
                        .or_insert_with(|| {
                            PartNumber::new(
                                &lot.buyer_part_number,
                                format!("{} - {}", item.name, lot.lot_number),
                                lot.description.clone(),
                            )
                        });
                }
            }
        }
        debug!(
            seeded = self.part_numbers.len(),
            "part number registry seeded from hierarchy"
        );
    }

    /// Appends a registry entry. Entries are never deleted.
    pub fn register_part_number(&self, part: PartNumber) -> Result<PartNumber, ServiceError> {
        if part.buyer_part_number.is_empty() {
            return Err(ServiceError::ValidationError(
                "Buyer part number cannot be empty".into(),
            ));
        }
        if self.part_numbers.contains_key(&part.buyer_part_number) {
            return Err(ServiceError::InvalidOperation(format!(
                "Part number {} is already registered",
                part.buyer_part_number
            )));
        }
        self.part_numbers
            .insert(part.buyer_part_number.clone(), part.clone());
        Ok(part)
    }

    pub fn part_number(&self, buyer_part_number: &str) -> Option<PartNumber> {
        self.part_numbers
            .get(buyer_part_number)
            .map(|e| e.value().clone())
    }

    pub fn has_part_number(&self, buyer_part_number: &str) -> bool {
        self.part_numbers.contains_key(buyer_part_number)
    }

    pub fn part_numbers(&self) -> Vec<PartNumber> {
        self.part_numbers.iter().map(|e| e.value().clone()).collect()
    }

    // ---- Serial creation ------------------------------------------------

    /// Inserts one serial, enforcing serial-number uniqueness within its
    /// buyer part number under the write lock.
    pub async fn create_serial(&self, serial: Serial) -> Result<Serial, ServiceError> {
        let mut inv = self.inventory.write().await;
        if inv.number_exists(&serial.buyer_part_number, &serial.serial_number) {
            return Err(ServiceError::ValidationError(format!(
                "Serial number {} already exists for part {}",
                serial.serial_number, serial.buyer_part_number
            )));
        }
        inv.insert(serial.clone());
        Ok(serial)
    }

    /// Inserts a pre-generated batch without number collision checks.
    /// Bulk numbering collisions are explicitly the caller's responsibility.
    pub async fn insert_serials(&self, serials: Vec<Serial>) -> Vec<Serial> {
        let mut inv = self.inventory.write().await;
        for serial in &serials {
            inv.insert(serial.clone());
        }
        serials
    }

    /// Inserts imported serials, skipping any whose serial number already
    /// exists under the same buyer part number. Returns the created serials
    /// and the skipped serial numbers.
    pub async fn import_serials(&self, serials: Vec<Serial>) -> (Vec<Serial>, Vec<String>) {
        let mut inv = self.inventory.write().await;
        let mut created = Vec::with_capacity(serials.len());
        let mut skipped = Vec::new();
        for serial in serials {
            if inv.number_exists(&serial.buyer_part_number, &serial.serial_number) {
                warn!(
                    serial_number = %serial.serial_number,
                    buyer_part_number = %serial.buyer_part_number,
                    "import row skipped: duplicate serial number"
                );
                skipped.push(serial.serial_number);
                continue;
            }
            inv.insert(serial.clone());
            created.push(serial);
        }
        (created, skipped)
    }

    // ---- Queries --------------------------------------------------------

    pub async fn serial(&self, id: Uuid) -> Option<Serial> {
        self.inventory.read().await.by_id.get(&id).cloned()
    }

    pub async fn serials_by_buyer_part_number(&self, buyer_part_number: &str) -> Vec<Serial> {
        let inv = self.inventory.read().await;
        inv.by_bpn
            .get(buyer_part_number)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inv.by_id.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn all_serials(&self) -> Vec<Serial> {
        self.inventory.read().await.by_id.values().cloned().collect()
    }

    pub async fn assigned_serials(
        &self,
        target_id: &str,
        target_type: TargetType,
    ) -> Vec<Serial> {
        self.inventory
            .read()
            .await
            .assigned_to_target(target_id, target_type)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn assigned_count(&self, target_id: &str, target_type: TargetType) -> u32 {
        self.inventory
            .read()
            .await
            .assigned_to_target(target_id, target_type)
            .len() as u32
    }

    /// Serials eligible for assignment to a target of the given kind:
    /// item/lot targets take unassigned serials, package targets take serials
    /// that are assigned or reserved but not yet shipped.
    pub async fn eligible_for_target(&self, target_type: TargetType) -> Vec<Serial> {
        let inv = self.inventory.read().await;
        inv.by_id
            .values()
            .filter(|s| match target_type {
                TargetType::Item | TargetType::Lot => s.status == SerialStatus::Unassigned,
                TargetType::Package => {
                    matches!(s.status, SerialStatus::Assigned | SerialStatus::Reserved)
                }
            })
            .cloned()
            .collect()
    }

    /// Nominal capacity for a target. Lots carry a real `serial_count`;
    /// item and package capacities are configured policy and may be absent
    /// (meaning unbounded).
    pub fn capacity_for(&self, target_id: &str, target_type: TargetType) -> Option<u32> {
        match target_type {
            TargetType::Lot => self.hierarchy.find_lot(target_id).map(|l| l.serial_count),
            TargetType::Item => self.config.default_item_capacity,
            TargetType::Package => self.config.default_package_capacity,
        }
    }

    /// Pure predicate mirroring the batch capacity check: does adding
    /// `additional` serials exceed the target's nominal capacity?
    pub async fn would_overassign(
        &self,
        target_id: &str,
        target_type: TargetType,
        additional: u32,
    ) -> bool {
        match self.capacity_for(target_id, target_type) {
            Some(capacity) => {
                self.assigned_count(target_id, target_type).await + additional > capacity
            }
            None => false,
        }
    }

    /// Live progress statistics for a target. Never cached on catalog nodes.
    pub async fn progress(&self, target_id: &str, target_type: TargetType) -> AssignmentProgress {
        let assigned = self.assigned_count(target_id, target_type).await;
        let capacity = self.capacity_for(target_id, target_type);
        let percent = capacity.filter(|&c| c > 0).map(|c| {
            (assigned as f32 / c as f32 * 100.0).min(100.0)
        });
        AssignmentProgress {
            assigned,
            capacity,
            percent,
        }
    }

    // ---- Assignment engine ----------------------------------------------

    /// Atomically assigns a batch of serials to one target.
    ///
    /// Capacity is a hard precondition: if the additional demand would exceed
    /// the target's nominal capacity the whole batch is rejected and nothing
    /// is mutated. Serials already bound to a *different* target are soft
    /// per-item skips reported in the outcome. Serials already on the same
    /// target count as zero additional demand and are merely re-stamped, so
    /// re-submitting a batch is idempotent with respect to capacity.
    pub async fn assign_batch(
        &self,
        serial_ids: &[Uuid],
        target_id: &str,
        target_type: TargetType,
        is_temporary: bool,
        target_name: &str,
    ) -> Result<AssignmentOutcome, ServiceError> {
        let mut inv = self.inventory.write().await;

        for id in serial_ids {
            if !inv.by_id.contains_key(id) {
                return Err(ServiceError::NotFound(format!("Serial {id} not found")));
            }
        }

        let mut fresh = Vec::new();
        let mut restamp = Vec::new();
        let mut skipped = Vec::new();
        for id in serial_ids {
            let serial = &inv.by_id[id];
            if serial.is_assigned_to(target_id, target_type) {
                restamp.push(*id);
            } else if serial.assigned_to.is_some() {
                skipped.push(SkippedAssignment {
                    serial_id: *id,
                    serial_number: serial.serial_number.clone(),
                    current_target_id: serial.assigned_to.clone().unwrap_or_default(),
                    current_target_type: serial.assigned_to_type.unwrap_or(target_type),
                });
            } else {
                fresh.push(*id);
            }
        }

        if let Some(capacity) = self.capacity_for(target_id, target_type) {
            let assigned = inv.assigned_to_target(target_id, target_type).len() as u32;
            let requested = fresh.len() as u32;
            if assigned + requested > capacity {
                return Err(ServiceError::Overassignment {
                    target_id: target_id.to_string(),
                    target_type,
                    capacity,
                    assigned,
                    requested,
                });
            }
        }

        let now = chrono::Utc::now();
        let mut assigned_ids = Vec::with_capacity(fresh.len() + restamp.len());
        for id in fresh.into_iter().chain(restamp) {
            if let Some(serial) = inv.by_id.get_mut(&id) {
                serial.assign(AssignmentDetails {
                    target_id: target_id.to_string(),
                    target_type,
                    target_name: target_name.to_string(),
                    assigned_at: now,
                    is_temporary,
                });
                assigned_ids.push(id);
            }
        }

        Ok(AssignmentOutcome {
            assigned: assigned_ids,
            skipped,
        })
    }

    /// Unconditionally resets the listed serials to unassigned. Idempotent on
    /// serials that are already unassigned.
    pub async fn unassign_batch(&self, serial_ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        let mut inv = self.inventory.write().await;
        for id in serial_ids {
            if !inv.by_id.contains_key(id) {
                return Err(ServiceError::NotFound(format!("Serial {id} not found")));
            }
        }
        let mut cleared = Vec::with_capacity(serial_ids.len());
        for id in serial_ids {
            if let Some(serial) = inv.by_id.get_mut(id) {
                serial.unassign();
                cleared.push(*id);
            }
        }
        Ok(cleared)
    }

    // ---- Relationship tracker -------------------------------------------

    /// Merges `child_ids` into the parent's child set and points each child's
    /// parent reference at the parent. A child already linked under another
    /// parent is detached from it first, preserving the single-parent
    /// invariant.
    pub async fn link_children(
        &self,
        parent_id: Uuid,
        child_ids: &[Uuid],
    ) -> Result<(), ServiceError> {
        let mut inv = self.inventory.write().await;
        if !inv.by_id.contains_key(&parent_id) {
            return Err(ServiceError::NotFound(format!(
                "Parent serial {parent_id} not found"
            )));
        }
        for id in child_ids {
            if !inv.by_id.contains_key(id) {
                return Err(ServiceError::NotFound(format!("Serial {id} not found")));
            }
            if *id == parent_id {
                return Err(ServiceError::ValidationError(
                    "A serial cannot be linked as its own child".into(),
                ));
            }
        }

        let now = chrono::Utc::now();
        for child_id in child_ids {
            let prior_parent = inv.by_id[child_id].parent_serial;
            if let Some(prior) = prior_parent.filter(|p| *p != parent_id) {
                if let Some(old_parent) = inv.by_id.get_mut(&prior) {
                    old_parent.child_serials.remove(child_id);
                    old_parent.updated_at = now;
                }
            }
            if let Some(child) = inv.by_id.get_mut(child_id) {
                child.parent_serial = Some(parent_id);
                child.updated_at = now;
            }
        }
        if let Some(parent) = inv.by_id.get_mut(&parent_id) {
            parent.child_serials.extend(child_ids.iter().copied());
            parent.updated_at = now;
        }
        Ok(())
    }

    /// Replaces the serial's declared child components wholesale.
    pub async fn set_child_components(
        &self,
        serial_id: Uuid,
        components: Vec<ChildComponent>,
    ) -> Result<(), ServiceError> {
        let mut inv = self.inventory.write().await;
        let serial = inv
            .by_id
            .get_mut(&serial_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Serial {serial_id} not found")))?;
        serial.child_components = components;
        serial.updated_at = chrono::Utc::now();
        Ok(())
    }
}
