use std::sync::Arc;

use serialtrack_api::{
    events, AppServices, AsnHierarchy, AsnItem, AsnLot, Datastore, EngineConfig, Event,
    PackingUnit, PackingUnitType, Serial, SerialStatus,
};
use tokio::sync::mpsc;

/// Catalog fixture mirroring a small shipment: one CPU item with two lots,
/// one lot-less item, and a container → pallet → carton packing tree.
#[allow(dead_code)]
pub fn test_hierarchy() -> AsnHierarchy {
    AsnHierarchy {
        items: vec![
            AsnItem {
                id: "item-001".into(),
                name: "High-Performance CPU".into(),
                part_number: "CPU-X1000".into(),
                buyer_part_number: "BPN-1".into(),
                description: Some("8-core processor".into()),
                lots: vec![
                    AsnLot {
                        id: "lot-001-A".into(),
                        lot_number: "LOT-CPU-001A".into(),
                        item_id: "item-001".into(),
                        buyer_part_number: "BPN-1".into(),
                        description: None,
                        serial_count: 5,
                    },
                    AsnLot {
                        id: "lot-001-B".into(),
                        lot_number: "LOT-CPU-001B".into(),
                        item_id: "item-001".into(),
                        buyer_part_number: "BPN-1".into(),
                        description: None,
                        serial_count: 8,
                    },
                ],
            },
            AsnItem {
                id: "item-002".into(),
                name: "Memory Module DDR5".into(),
                part_number: "MEM-DDR5-32GB".into(),
                buyer_part_number: "BPN-2".into(),
                description: None,
                lots: vec![],
            },
        ],
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
                children: vec![PackingUnit {
                    id: "carton-001".into(),
                    unit_type: PackingUnitType::Carton,
                    identifier: "CTN-001".into(),
                    level: 2,
                    children: vec![],
                }],
            }],
        }],
    }
}

/// Builds the full service bundle over a fresh datastore. The receiver must
/// stay alive for the duration of the test or event publication fails.
#[allow(dead_code)]
pub fn test_services() -> (AppServices, Arc<Datastore>, mpsc::Receiver<Event>) {
    test_services_with_config(EngineConfig::default())
}

#[allow(dead_code)]
pub fn test_services_with_config(
    config: EngineConfig,
) -> (AppServices, Arc<Datastore>, mpsc::Receiver<Event>) {
    let store = Arc::new(Datastore::new(test_hierarchy(), config));
    let (sender, receiver) = events::channel(64);
    let services = AppServices::new(store.clone(), Arc::new(sender));
    (services, store, receiver)
}

/// Asserts the core invariant: unassigned ⟺ no target ⟺ no provenance.
#[allow(dead_code)]
pub fn assert_status_consistent(serial: &Serial) {
    let unassigned = serial.status == SerialStatus::Unassigned;
    assert_eq!(serial.assigned_to.is_none(), unassigned);
    assert_eq!(serial.assigned_to_type.is_none(), unassigned);
    assert_eq!(serial.assignment_details.is_none(), unassigned);
}
