use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{Serial, SerialStatus},
    store::Datastore,
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref SERIAL_CREATIONS: IntCounter =
        IntCounter::new("serial_creations_total", "Total number of serials created")
            .expect("metric can be created");
    static ref SERIAL_CREATION_FAILURES: IntCounter = IntCounter::new(
        "serial_creation_failures_total",
        "Total number of failed serial creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSerialCommand {
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Buyer part number is required"))]
    pub buyer_part_number: String,
    /// Free-form attributes recorded at creation and never overwritten by
    /// the engine afterward.
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSerialResult {
    pub id: Uuid,
    pub serial_number: String,
    pub buyer_part_number: String,
    pub status: SerialStatus,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreateSerialCommand {
    type Result = CreateSerialResult;

    #[instrument(skip(self, store, event_sender), fields(serial_number = %self.serial_number))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            SERIAL_CREATION_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if !store.has_part_number(&self.buyer_part_number) {
            SERIAL_CREATION_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "Unknown buyer part number: {}",
                self.buyer_part_number
            )));
        }

        let serial = store
            .create_serial(Serial::new(
                &self.serial_number,
                &self.buyer_part_number,
                self.custom_attributes.clone(),
            ))
            .await
            .map_err(|e| {
                SERIAL_CREATION_FAILURES.inc();
                e
            })?;

        info!(
            serial_id = %serial.id,
            buyer_part_number = %serial.buyer_part_number,
            "serial created"
        );

        event_sender
            .send(Event::SerialCreated {
                serial_id: serial.id,
                buyer_part_number: serial.buyer_part_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        SERIAL_CREATIONS.inc();

        Ok(CreateSerialResult {
            id: serial.id,
            serial_number: serial.serial_number,
            buyer_part_number: serial.buyer_part_number,
            status: serial.status,
            created_at: serial.created_at,
        })
    }
}
