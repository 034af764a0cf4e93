use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::ChildComponent,
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
    static ref COMPONENT_DECLARATIONS: IntCounter = IntCounter::new(
        "serial_component_declarations_total",
        "Total number of child component declaration updates"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChildComponentInput {
    #[validate(length(min = 1, message = "Buyer part number is required"))]
    pub buyer_part_number: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// Replaces a serial's declared child components wholesale. The declaration
/// is planning data, independent of actual child serial links.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SetChildComponentsCommand {
    pub serial_id: Uuid,
    #[validate]
    pub components: Vec<ChildComponentInput>,
}

#[async_trait::async_trait]
impl Command for SetChildComponentsCommand {
    type Result = ();

    #[instrument(skip(self, store, event_sender), fields(serial = %self.serial_id, components = self.components.len()))]
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

        let components: Vec<ChildComponent> = self
            .components
            .iter()
            .map(|c| ChildComponent {
                buyer_part_number: c.buyer_part_number.clone(),
                quantity: c.quantity,
            })
            .collect();

        store
            .set_child_components(self.serial_id, components)
            .await?;

        info!(
            serial = %self.serial_id,
            components = self.components.len(),
            "child components declared"
        );

        event_sender
            .send(Event::ChildComponentsSet {
                serial_id: self.serial_id,
                component_count: self.components.len() as u32,
            })
            .await
            .map_err(ServiceError::EventError)?;

        COMPONENT_DECLARATIONS.inc();

        Ok(())
    }
}
