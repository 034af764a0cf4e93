use crate::{
    commands::serials::{
        BulkCreateSerialsCommand, BulkCreateSerialsResult, CreateSerialCommand,
        CreateSerialResult, ImportSerialsCommand, ImportSerialsResult,
    },
    commands::Command,
    errors::ServiceError,
    events::EventSender,
    models::Serial,
    store::Datastore,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for serial lifecycle: creation (single, bulk, import) and lookup.
#[derive(Clone)]
pub struct SerialService {
    store: Arc<Datastore>,
    event_sender: Arc<EventSender>,
}

impl SerialService {
    /// Creates a new serial service instance over the shared datastore.
    pub fn new(store: Arc<Datastore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_serial(
        &self,
        command: CreateSerialCommand,
    ) -> Result<CreateSerialResult, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn bulk_create_serials(
        &self,
        command: BulkCreateSerialsCommand,
    ) -> Result<BulkCreateSerialsResult, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn import_serials(
        &self,
        command: ImportSerialsCommand,
    ) -> Result<ImportSerialsResult, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    /// Looks up a serial by id.
    #[instrument(skip(self))]
    pub async fn get_serial(&self, id: Uuid) -> Result<Serial, ServiceError> {
        self.store
            .serial(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("Serial {id} not found")))
    }

    /// Current snapshot of serials under one buyer part number.
    #[instrument(skip(self))]
    pub async fn get_serials_by_buyer_part_number(
        &self,
        buyer_part_number: &str,
    ) -> Vec<Serial> {
        self.store
            .serials_by_buyer_part_number(buyer_part_number)
            .await
    }

    /// Snapshot of every serial in the store.
    #[instrument(skip(self))]
    pub async fn get_all_serials(&self) -> Vec<Serial> {
        self.store.all_serials().await
    }
}
