use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::TargetType;

/// Catalog line in the shipment structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsnItem {
    pub id: String,
    pub name: String,
    pub part_number: String,
    pub buyer_part_number: String,
    pub description: Option<String>,
    pub lots: Vec<AsnLot>,
}

/// Sub-batch of an item. `serial_count` is the nominal capacity; the live
/// assigned count is always computed from the serial store, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsnLot {
    pub id: String,
    pub lot_number: String,
    pub item_id: String,
    pub buyer_part_number: String,
    pub description: Option<String>,
    pub serial_count: u32,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackingUnitType {
    Container,
    Pallet,
    Carton,
}

/// Node in the physical packing tree (container ⊇ pallet ⊇ carton).
///
/// The tree is built once from static hierarchy data and never mutated by the
/// engine, so exclusive ownership through `children` keeps it acyclic by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingUnit {
    pub id: String,
    pub unit_type: PackingUnitType,
    pub identifier: String,
    pub level: u8,
    pub children: Vec<PackingUnit>,
}

impl PackingUnit {
    fn find(&self, id: &str) -> Option<&PackingUnit> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Read-mostly tree of shipment structure: items with their lots, plus the
/// separate packing-unit tree. Supplies target identities and nominal
/// capacities to the assignment engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsnHierarchy {
    pub items: Vec<AsnItem>,
    pub packing_structure: Vec<PackingUnit>,
}

impl AsnHierarchy {
    pub fn find_item(&self, id: &str) -> Option<&AsnItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_lot(&self, id: &str) -> Option<&AsnLot> {
        self.items
            .iter()
            .flat_map(|i| i.lots.iter())
            .find(|l| l.id == id)
    }

    pub fn find_packing_unit(&self, id: &str) -> Option<&PackingUnit> {
        self.packing_structure.iter().find_map(|u| u.find(id))
    }

    /// Whether a target id resolves to a node of the given kind.
    pub fn contains_target(&self, target_id: &str, target_type: TargetType) -> bool {
        match target_type {
            TargetType::Item => self.find_item(target_id).is_some(),
            TargetType::Lot => self.find_lot(target_id).is_some(),
            TargetType::Package => self.find_packing_unit(target_id).is_some(),
        }
    }

    /// Display name for a target, used as the provenance fallback.
    pub fn target_name(&self, target_id: &str, target_type: TargetType) -> Option<String> {
        match target_type {
            TargetType::Item => self.find_item(target_id).map(|i| i.name.clone()),
            TargetType::Lot => self.find_lot(target_id).map(|l| l.lot_number.clone()),
            TargetType::Package => self
                .find_packing_unit(target_id)
                .map(|u| u.identifier.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carton(id: &str) -> PackingUnit {
        PackingUnit {
            id: id.to_string(),
            unit_type: PackingUnitType::Carton,
            identifier: format!("CTN-{id}"),
            level: 2,
            children: vec![],
        }
    }

    #[test]
    fn packing_lookup_descends_the_tree() {
        let hierarchy = AsnHierarchy {
            items: vec![],
            packing_structure: vec![PackingUnit {
                id: "container-001".into(),
                unit_type: PackingUnitType::Container,
                identifier: "CONT-001".into(),
                level: 0,
                children: vec![PackingUnit {
                    id: "pallet-001".into(),
                    unit_type: PackingUnitType::Pallet,
                    identifier: "PLT-001".into(),
                    level: 1,
                    children: vec![carton("carton-001"), carton("carton-002")],
                }],
            }],
        };

        assert!(hierarchy.contains_target("carton-002", TargetType::Package));
        assert!(!hierarchy.contains_target("carton-002", TargetType::Lot));
        assert_eq!(
            hierarchy.target_name("pallet-001", TargetType::Package).as_deref(),
            Some("PLT-001")
        );
    }
}
