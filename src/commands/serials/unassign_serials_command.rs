use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    store::Datastore,
};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref SERIAL_UNASSIGNMENTS: IntCounter = IntCounter::new(
        "serial_unassignments_total",
        "Total number of serial unassignment batches"
    )
    .expect("metric can be created");
}

/// Unconditionally resets the listed serials to unassigned, clearing target
/// and provenance fields. Idempotent on already-unassigned serials.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UnassignSerialsCommand {
    #[validate(length(min = 1, message = "At least one serial is required"))]
    pub serial_ids: Vec<Uuid>,
}

#[async_trait::async_trait]
impl Command for UnassignSerialsCommand {
    type Result = Vec<Uuid>;

    #[instrument(skip(self, store, event_sender), fields(count = self.serial_ids.len()))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let cleared = store.unassign_batch(&self.serial_ids).await?;

        info!(count = cleared.len(), "serials unassigned");

        event_sender
            .send(Event::SerialsUnassigned {
                serial_ids: cleared.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        SERIAL_UNASSIGNMENTS.inc();

        Ok(cleared)
    }
}
