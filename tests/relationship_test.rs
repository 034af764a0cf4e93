//! Parent/child serial linkage and declared child components.

mod common;

use common::test_services;
use serialtrack_api::{
    commands::serials::{
        BulkCreateSerialsCommand, ChildComponentInput, LinkChildSerialsCommand,
        SetChildComponentsCommand,
    },
    ServiceError,
};
use uuid::Uuid;

async fn seeded_ids(services: &serialtrack_api::AppServices, count: u32) -> Vec<Uuid> {
    services
        .serials
        .bulk_create_serials(BulkCreateSerialsCommand {
            prefix: "SN".into(),
            start_number: 1,
            count,
            buyer_part_number: "BPN-1".into(),
        })
        .await
        .unwrap()
        .serial_ids
}

#[tokio::test]
async fn linking_merges_as_a_set() {
    let (services, store, _rx) = test_services();
    let ids = seeded_ids(&services, 4).await;
    let (parent, c1, c2, c3) = (ids[0], ids[1], ids[2], ids[3]);

    services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: parent,
            child_serial_ids: vec![c1, c2],
        })
        .await
        .unwrap();
    services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: parent,
            child_serial_ids: vec![c2, c3],
        })
        .await
        .unwrap();

    let p = store.serial(parent).await.unwrap();
    assert_eq!(p.child_serials.len(), 3);
    for child in [c1, c2, c3] {
        assert!(p.child_serials.contains(&child));
        assert_eq!(
            store.serial(child).await.unwrap().parent_serial,
            Some(parent)
        );
    }
}

#[tokio::test]
async fn linking_to_a_new_parent_detaches_the_old_one() {
    let (services, store, _rx) = test_services();
    let ids = seeded_ids(&services, 3).await;
    let (p1, p2, child) = (ids[0], ids[1], ids[2]);

    services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: p1,
            child_serial_ids: vec![child],
        })
        .await
        .unwrap();
    services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: p2,
            child_serial_ids: vec![child],
        })
        .await
        .unwrap();

    assert!(!store.serial(p1).await.unwrap().child_serials.contains(&child));
    assert!(store.serial(p2).await.unwrap().child_serials.contains(&child));
    assert_eq!(store.serial(child).await.unwrap().parent_serial, Some(p2));

    let children = services.relationships.get_child_serials(p2).await.unwrap();
    assert_eq!(children.len(), 1);
    let parent = services
        .relationships
        .get_parent_serial(child)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.id, p2);
}

#[tokio::test]
async fn linking_requires_existing_parent_and_children() {
    let (services, _store, _rx) = test_services();
    let ids = seeded_ids(&services, 1).await;

    let err = services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: Uuid::new_v4(),
            child_serial_ids: vec![ids[0]],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: ids[0],
            child_serial_ids: vec![Uuid::new_v4()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn a_serial_cannot_contain_itself() {
    let (services, _store, _rx) = test_services();
    let ids = seeded_ids(&services, 1).await;

    let err = services
        .relationships
        .link_child_serials(LinkChildSerialsCommand {
            parent_serial_id: ids[0],
            child_serial_ids: vec![ids[0]],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn child_components_replace_wholesale() {
    let (services, store, _rx) = test_services();
    let ids = seeded_ids(&services, 1).await;

    services
        .relationships
        .set_child_components(SetChildComponentsCommand {
            serial_id: ids[0],
            components: vec![
                ChildComponentInput {
                    buyer_part_number: "BPN-1".into(),
                    quantity: 2,
                },
                ChildComponentInput {
                    buyer_part_number: "BPN-2".into(),
                    quantity: 1,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(store.serial(ids[0]).await.unwrap().child_components.len(), 2);

    // A second declaration replaces, not merges.
    services
        .relationships
        .set_child_components(SetChildComponentsCommand {
            serial_id: ids[0],
            components: vec![ChildComponentInput {
                buyer_part_number: "BPN-2".into(),
                quantity: 4,
            }],
        })
        .await
        .unwrap();
    let components = store.serial(ids[0]).await.unwrap().child_components;
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].buyer_part_number, "BPN-2");
    assert_eq!(components[0].quantity, 4);
}

#[tokio::test]
async fn child_component_quantity_must_be_positive() {
    let (services, _store, _rx) = test_services();
    let ids = seeded_ids(&services, 1).await;

    let err = services
        .relationships
        .set_child_components(SetChildComponentsCommand {
            serial_id: ids[0],
            components: vec![ChildComponentInput {
                buyer_part_number: "BPN-1".into(),
                quantity: 0,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn declarations_for_unknown_serials_are_not_found() {
    let (services, _store, _rx) = test_services();

    let err = services
        .relationships
        .set_child_components(SetChildComponentsCommand {
            serial_id: Uuid::new_v4(),
            components: vec![ChildComponentInput {
                buyer_part_number: "BPN-1".into(),
                quantity: 1,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
