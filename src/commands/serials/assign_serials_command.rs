use crate::{
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::TargetType,
    store::{Datastore, SkippedAssignment},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref SERIAL_ASSIGNMENTS: IntCounter = IntCounter::new(
        "serial_assignments_total",
        "Total number of serial assignment batches"
    )
    .expect("metric can be created");
    static ref SERIAL_ASSIGNMENT_FAILURES: IntCounter = IntCounter::new(
        "serial_assignment_failures_total",
        "Total number of rejected serial assignment batches"
    )
    .expect("metric can be created");
    static ref SERIAL_ASSIGNMENT_SKIPS: IntCounter = IntCounter::new(
        "serial_assignment_skips_total",
        "Total number of serials skipped during assignment due to conflicts"
    )
    .expect("metric can be created");
}

/// Assigns a batch of serials to one target, or unassigns them when
/// `target_id` is the empty-string sentinel.
///
/// Capacity is checked per batch and rejects the whole batch; serials already
/// bound to a different target are skipped individually and reported.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AssignSerialsCommand {
    #[validate(length(min = 1, message = "At least one serial is required"))]
    pub serial_ids: Vec<Uuid>,
    /// `""` means "unassign the listed serials".
    pub target_id: String,
    pub target_type: TargetType,
    #[serde(default)]
    pub is_temporary: bool,
    /// Display name recorded in provenance; falls back to the catalog name,
    /// then to the target id.
    #[serde(default)]
    pub target_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignSerialsResult {
    pub target_id: String,
    pub target_type: TargetType,
    pub assigned: Vec<Uuid>,
    pub skipped: Vec<SkippedAssignment>,
    pub unassigned: bool,
}

#[async_trait::async_trait]
impl Command for AssignSerialsCommand {
    type Result = AssignSerialsResult;

    #[instrument(skip(self, store, event_sender), fields(target_id = %self.target_id, target_type = %self.target_type))]
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            SERIAL_ASSIGNMENT_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        // Empty target id is the reserved unassign sentinel.
        if self.target_id.is_empty() {
            let cleared = store.unassign_batch(&self.serial_ids).await?;
            info!(count = cleared.len(), "serials unassigned via sentinel");
            event_sender
                .send(Event::SerialsUnassigned {
                    serial_ids: cleared.clone(),
                })
                .await
                .map_err(ServiceError::EventError)?;
            return Ok(AssignSerialsResult {
                target_id: String::new(),
                target_type: self.target_type,
                assigned: Vec::new(),
                skipped: Vec::new(),
                unassigned: true,
            });
        }

        let target_name = self
            .target_name
            .clone()
            .or_else(|| store.hierarchy().target_name(&self.target_id, self.target_type))
            .unwrap_or_else(|| self.target_id.clone());

        let outcome = store
            .assign_batch(
                &self.serial_ids,
                &self.target_id,
                self.target_type,
                self.is_temporary,
                &target_name,
            )
            .await
            .map_err(|e| {
                SERIAL_ASSIGNMENT_FAILURES.inc();
                e
            })?;

        if !outcome.skipped.is_empty() {
            SERIAL_ASSIGNMENT_SKIPS.inc_by(outcome.skipped.len() as u64);
            warn!(
                skipped = outcome.skipped.len(),
                "serials already bound to another target were skipped"
            );
        }

        info!(
            assigned = outcome.assigned.len(),
            skipped = outcome.skipped.len(),
            temporary = self.is_temporary,
            "assignment batch applied"
        );

        event_sender
            .send(Event::SerialsAssigned {
                target_id: self.target_id.clone(),
                target_type: self.target_type,
                assigned: outcome.assigned.clone(),
                skipped: outcome.skipped.iter().map(|s| s.serial_id).collect(),
                is_temporary: self.is_temporary,
                assigned_at: Utc::now(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        SERIAL_ASSIGNMENTS.inc();

        Ok(AssignSerialsResult {
            target_id: self.target_id.clone(),
            target_type: self.target_type,
            assigned: outcome.assigned,
            skipped: outcome.skipped,
            unassigned: false,
        })
    }
}
