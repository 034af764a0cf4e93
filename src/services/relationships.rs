use crate::{
    commands::serials::{LinkChildSerialsCommand, SetChildComponentsCommand},
    commands::Command,
    errors::ServiceError,
    events::EventSender,
    models::Serial,
    store::Datastore,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for parent/child serial linkage and declared child components.
#[derive(Clone)]
pub struct RelationshipService {
    store: Arc<Datastore>,
    event_sender: Arc<EventSender>,
}

impl RelationshipService {
    /// Creates a new relationship service instance over the shared datastore.
    pub fn new(store: Arc<Datastore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn link_child_serials(
        &self,
        command: LinkChildSerialsCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn set_child_components(
        &self,
        command: SetChildComponentsCommand,
    ) -> Result<(), ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    /// Resolves the linked child serials of a parent.
    #[instrument(skip(self))]
    pub async fn get_child_serials(&self, parent_id: Uuid) -> Result<Vec<Serial>, ServiceError> {
        let parent = self
            .store
            .serial(parent_id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("Serial {parent_id} not found")))?;
        let mut children = Vec::with_capacity(parent.child_serials.len());
        for child_id in parent.child_serials {
            if let Some(child) = self.store.serial(child_id).await {
                children.push(child);
            }
        }
        Ok(children)
    }

    /// Resolves the parent serial of a child, if linked.
    #[instrument(skip(self))]
    pub async fn get_parent_serial(&self, child_id: Uuid) -> Result<Option<Serial>, ServiceError> {
        let child = self
            .store
            .serial(child_id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("Serial {child_id} not found")))?;
        match child.parent_serial {
            Some(parent_id) => Ok(self.store.serial(parent_id).await),
            None => Ok(None),
        }
    }
}
