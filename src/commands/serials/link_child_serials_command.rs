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
    static ref CHILD_LINKS: IntCounter = IntCounter::new(
        "serial_child_links_total",
        "Total number of child serial link operations"
    )
    .expect("metric can be created");
    static ref CHILD_LINK_FAILURES: IntCounter = IntCounter::new(
        "serial_child_link_failures_total",
        "Total number of failed child serial link operations"
    )
    .expect("metric can be created");
}

/// Links component serials under a parent serial (set union; duplicates are
/// ignored). A child already linked under a different parent is detached
/// from it first.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LinkChildSerialsCommand {
    pub parent_serial_id: Uuid,
    #[validate(length(min = 1, message = "At least one child serial is required"))]
    pub child_serial_ids: Vec<Uuid>,
}

#[async_trait::async_trait]
impl Command for LinkChildSerialsCommand {
    type Result = ();

    #[instrument(skip(self, store, event_sender), fields(parent = %self.parent_serial_id, children = self.child_serial_ids.len()))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            CHILD_LINK_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        store
            .link_children(self.parent_serial_id, &self.child_serial_ids)
            .await
            .map_err(|e| {
                CHILD_LINK_FAILURES.inc();
                e
            })?;

        info!(
            parent = %self.parent_serial_id,
            children = self.child_serial_ids.len(),
            "child serials linked"
        );

        event_sender
            .send(Event::ChildSerialsLinked {
                parent_id: self.parent_serial_id,
                child_ids: self.child_serial_ids.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        CHILD_LINKS.inc();

        Ok(())
    }
}
