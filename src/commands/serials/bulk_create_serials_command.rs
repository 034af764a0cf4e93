use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::Serial,
    store::Datastore,
};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref BULK_CREATIONS: IntCounter = IntCounter::new(
        "serial_bulk_creations_total",
        "Total number of bulk serial creation batches"
    )
    .expect("metric can be created");
    static ref BULK_CREATION_FAILURES: IntCounter = IntCounter::new(
        "serial_bulk_creation_failures_total",
        "Total number of failed bulk serial creations"
    )
    .expect("metric can be created");
}

/// Generates `count` serials numbered `prefix + zero-padded(start_number + i)`.
///
/// Numbering collisions with existing serials are not checked; sequential
/// ranges are the caller's responsibility.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkCreateSerialsCommand {
    #[validate(length(min = 1, message = "Prefix is required"))]
    pub prefix: String,
    #[validate(range(min = 1))]
    pub start_number: u32,
    #[validate(range(min = 1, max = 1000))]
    pub count: u32,
    #[validate(length(min = 1, message = "Buyer part number is required"))]
    pub buyer_part_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkCreateSerialsResult {
    pub buyer_part_number: String,
    pub serial_ids: Vec<Uuid>,
    pub first_serial_number: String,
    pub last_serial_number: String,
}

#[async_trait::async_trait]
impl Command for BulkCreateSerialsCommand {
    type Result = BulkCreateSerialsResult;

    #[instrument(skip(self, store, event_sender), fields(prefix = %self.prefix, count = self.count))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            BULK_CREATION_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if self.count > store.config().bulk_create_max {
            BULK_CREATION_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "Bulk creation is limited to {} serials per batch",
                store.config().bulk_create_max
            )));
        }

        // count >= 1 was validated above, so start + (count - 1) is the last
        // number in the range.
        if self.start_number.checked_add(self.count - 1).is_none() {
            BULK_CREATION_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "Numbering range starting at {} overflows with {} serials",
                self.start_number, self.count
            )));
        }

        if !store.has_part_number(&self.buyer_part_number) {
            BULK_CREATION_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "Unknown buyer part number: {}",
                self.buyer_part_number
            )));
        }

        let width = store.config().serial_pad_width;
        let serials: Vec<Serial> = (0..self.count)
            .map(|i| {
                let number = format!(
                    "{}{:0width$}",
                    self.prefix,
                    self.start_number + i,
                    width = width
                );
                Serial::new(number, &self.buyer_part_number, BTreeMap::new())
            })
            .collect();

        let created = store.insert_serials(serials).await;
        let first = created
            .first()
            .map(|s| s.serial_number.clone())
            .unwrap_or_default();
        let last = created
            .last()
            .map(|s| s.serial_number.clone())
            .unwrap_or_default();

        info!(
            buyer_part_number = %self.buyer_part_number,
            count = created.len(),
            first = %first,
            last = %last,
            "bulk serials created"
        );

        event_sender
            .send(Event::SerialsBulkCreated {
                buyer_part_number: self.buyer_part_number.clone(),
                count: created.len() as u32,
                first_serial_number: first.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        BULK_CREATIONS.inc();

        Ok(BulkCreateSerialsResult {
            buyer_part_number: self.buyer_part_number.clone(),
            serial_ids: created.iter().map(|s| s.id).collect(),
            first_serial_number: first,
            last_serial_number: last,
        })
    }
}
