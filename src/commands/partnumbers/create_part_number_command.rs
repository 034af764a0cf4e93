use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::PartNumber,
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
    static ref PART_NUMBER_CREATIONS: IntCounter = IntCounter::new(
        "part_number_creations_total",
        "Total number of part numbers registered"
    )
    .expect("metric can be created");
    static ref PART_NUMBER_CREATION_FAILURES: IntCounter = IntCounter::new(
        "part_number_creation_failures_total",
        "Total number of failed part number registrations"
    )
    .expect("metric can be created");
}

/// Appends a new entry to the part number registry. Registry entries are
/// never deleted.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePartNumberCommand {
    #[validate(length(min = 1, message = "Buyer part number is required"))]
    pub buyer_part_number: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePartNumberResult {
    pub id: Uuid,
    pub buyer_part_number: String,
    pub name: String,
}

#[async_trait::async_trait]
impl Command for CreatePartNumberCommand {
    type Result = CreatePartNumberResult;

    #[instrument(skip(self, store, event_sender), fields(buyer_part_number = %self.buyer_part_number))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PART_NUMBER_CREATION_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let part = store
            .register_part_number(PartNumber::new(
                &self.buyer_part_number,
                &self.name,
                self.description.clone(),
            ))
            .map_err(|e| {
                PART_NUMBER_CREATION_FAILURES.inc();
                e
            })?;

        info!(buyer_part_number = %part.buyer_part_number, "part number registered");

        event_sender
            .send(Event::PartNumberCreated {
                buyer_part_number: part.buyer_part_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        PART_NUMBER_CREATIONS.inc();

        Ok(CreatePartNumberResult {
            id: part.id,
            buyer_part_number: part.buyer_part_number,
            name: part.name,
        })
    }
}
