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
    static ref SERIAL_IMPORTS: IntCounter = IntCounter::new(
        "serial_imports_total",
        "Total number of serial import batches"
    )
    .expect("metric can be created");
    static ref SERIAL_IMPORT_FAILURES: IntCounter = IntCounter::new(
        "serial_import_failures_total",
        "Total number of failed serial imports"
    )
    .expect("metric can be created");
}

/// One already-parsed import row: the serial number plus whatever named
/// columns the upload carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialRecord {
    pub serial_number: String,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

/// Creates serials from parsed import records. Records with an empty serial
/// number are silently dropped; records whose serial number already exists
/// under the same buyer part number are skipped and reported.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ImportSerialsCommand {
    pub records: Vec<SerialRecord>,
    #[validate(length(min = 1, message = "Buyer part number is required"))]
    pub buyer_part_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportSerialsResult {
    pub buyer_part_number: String,
    pub serial_ids: Vec<Uuid>,
    /// Serial numbers skipped because they already exist for this part.
    pub skipped_serial_numbers: Vec<String>,
    /// Rows dropped for having an empty serial number.
    pub dropped_rows: u32,
}

#[async_trait::async_trait]
impl Command for ImportSerialsCommand {
    type Result = ImportSerialsResult;

    #[instrument(skip(self, store, event_sender), fields(records = self.records.len()))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            SERIAL_IMPORT_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if !store.has_part_number(&self.buyer_part_number) {
            SERIAL_IMPORT_FAILURES.inc();
            return Err(ServiceError::ValidationError(format!(
                "Unknown buyer part number: {}",
                self.buyer_part_number
            )));
        }

        let mut dropped = 0u32;
        let serials: Vec<Serial> = self
            .records
            .iter()
            .filter(|r| {
                if r.serial_number.is_empty() {
                    dropped += 1;
                    false
                } else {
                    true
                }
            })
            .map(|r| {
                Serial::new(
                    &r.serial_number,
                    &self.buyer_part_number,
                    r.custom_attributes.clone(),
                )
            })
            .collect();

        let (created, skipped) = store.import_serials(serials).await;

        info!(
            buyer_part_number = %self.buyer_part_number,
            created = created.len(),
            skipped = skipped.len(),
            dropped,
            "serials imported"
        );

        event_sender
            .send(Event::SerialsImported {
                buyer_part_number: self.buyer_part_number.clone(),
                created: created.len() as u32,
                skipped: skipped.len() as u32,
            })
            .await
            .map_err(ServiceError::EventError)?;

        SERIAL_IMPORTS.inc();

        Ok(ImportSerialsResult {
            buyer_part_number: self.buyer_part_number.clone(),
            serial_ids: created.iter().map(|s| s.id).collect(),
            skipped_serial_numbers: skipped,
            dropped_rows: dropped,
        })
    }
}
