use crate::{
    commands::serials::{AssignSerialsCommand, AssignSerialsResult, UnassignSerialsCommand},
    commands::Command,
    errors::ServiceError,
    events::EventSender,
    models::{Serial, TargetType},
    store::{AssignmentProgress, Datastore},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the assignment state engine: batch assign/unassign plus the
/// capacity predicate and live target statistics.
#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<Datastore>,
    event_sender: Arc<EventSender>,
}

impl AssignmentService {
    /// Creates a new assignment service instance over the shared datastore.
    /// Must be handed the same `Datastore` as the relationship and serial
    /// services, or assignment and linkage state will diverge.
    pub fn new(store: Arc<Datastore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn assign_serials(
        &self,
        command: AssignSerialsCommand,
    ) -> Result<AssignSerialsResult, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn unassign_serials(
        &self,
        command: UnassignSerialsCommand,
    ) -> Result<Vec<Uuid>, ServiceError> {
        command
            .execute(self.store.clone(), self.event_sender.clone())
            .await
    }

    /// Pure predicate: would assigning `additional_count` more serials to the
    /// target exceed its nominal capacity? Never mutates state.
    #[instrument(skip(self))]
    pub async fn would_overassign(
        &self,
        target_id: &str,
        target_type: TargetType,
        additional_count: u32,
    ) -> bool {
        self.store
            .would_overassign(target_id, target_type, additional_count)
            .await
    }

    /// Serials currently bound to the given target.
    #[instrument(skip(self))]
    pub async fn get_assigned_serials(
        &self,
        target_id: &str,
        target_type: TargetType,
    ) -> Vec<Serial> {
        self.store.assigned_serials(target_id, target_type).await
    }

    /// Serials that a target of this kind may accept: unassigned stock for
    /// item/lot targets, assigned-but-unshipped stock for package targets.
    #[instrument(skip(self))]
    pub async fn get_eligible_serials(&self, target_type: TargetType) -> Vec<Serial> {
        self.store.eligible_for_target(target_type).await
    }

    /// Live assigned-count / capacity / percent for a target.
    #[instrument(skip(self))]
    pub async fn get_progress(
        &self,
        target_id: &str,
        target_type: TargetType,
    ) -> AssignmentProgress {
        self.store.progress(target_id, target_type).await
    }
}
