use crate::{
    commands::partnumbers::{CreatePartNumberCommand, CreatePartNumberResult},
    commands::Command,
    errors::ServiceError,
    events::EventSender,
    models::{AsnHierarchy, AsnItem, AsnLot, PackingUnit, PartNumber, TargetType},
    store::{AssignmentProgress, Datastore},
};
use std::sync::Arc;
use tracing::instrument;

/// Service over the read-mostly hierarchy catalog and the part number
/// registry. The catalog itself is fixed at construction; only the registry
/// grows.
#[derive(Clone)]
pub struct HierarchyService {
    store: Arc<Datastore>,
    event_sender: Arc<EventSender>,
}

impl HierarchyService {
    /// Creates a new hierarchy service instance over the shared datastore.
    pub fn new(store: Arc<Datastore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    pub fn hierarchy(&self) -> &AsnHierarchy {
        self.store.hierarchy()
    }

    pub fn get_item(&self, id: &str) -> Option<AsnItem> {
        self.store.hierarchy().find_item(id).cloned()
    }

    pub fn get_lot(&self, id: &str) -> Option<AsnLot> {
        self.store.hierarchy().find_lot(id).cloned()
    }

    pub fn get_packing_unit(&self, id: &str) -> Option<PackingUnit> {
        self.store.hierarchy().find_packing_unit(id).cloned()
    }

    #[instrument(skip(self, command))]
    pub async fn create_part_number(
        &self,
        command: CreatePartNumberCommand,
    ) -> Result<CreatePartNumberResult, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    pub fn get_part_numbers(&self) -> Vec<PartNumber> {
        self.store.part_numbers()
    }

    pub fn get_part_number(&self, buyer_part_number: &str) -> Option<PartNumber> {
        self.store.part_number(buyer_part_number)
    }

    /// Live progress for any catalog target, computed from the serial store.
    #[instrument(skip(self))]
    pub async fn get_progress(
        &self,
        target_id: &str,
        target_type: TargetType,
    ) -> AssignmentProgress {
        self.store.progress(target_id, target_type).await
    }
}
