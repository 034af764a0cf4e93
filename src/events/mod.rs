use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::TargetType;

/// Domain events published by the engine after each successful mutation.
///
/// Events are notification-only: consumers observe them for logging, UI
/// refresh, or downstream sync, but the serial store is already consistent by
/// the time an event is visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SerialCreated {
        serial_id: Uuid,
        buyer_part_number: String,
    },
    SerialsBulkCreated {
        buyer_part_number: String,
        count: u32,
        first_serial_number: String,
    },
    SerialsImported {
        buyer_part_number: String,
        created: u32,
        skipped: u32,
    },
    SerialsAssigned {
        target_id: String,
        target_type: TargetType,
        assigned: Vec<Uuid>,
        skipped: Vec<Uuid>,
        is_temporary: bool,
        assigned_at: DateTime<Utc>,
    },
    SerialsUnassigned {
        serial_ids: Vec<Uuid>,
    },
    ChildSerialsLinked {
        parent_id: Uuid,
        child_ids: Vec<Uuid>,
    },
    ChildComponentsSet {
        serial_id: Uuid,
        component_count: u32,
    },
    PartNumberCreated {
        buyer_part_number: String,
    },
}

/// Cloneable handle for publishing events into the processing channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a bounded event channel, returning the sender handle and receiver.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Hosts spawn this alongside
/// the services; it exits when every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::SerialsAssigned {
                target_id,
                target_type,
                assigned,
                skipped,
                is_temporary,
                ..
            } => {
                info!(
                    %target_id,
                    %target_type,
                    assigned = assigned.len(),
                    temporary = is_temporary,
                    "serials assigned"
                );
                if !skipped.is_empty() {
                    warn!(
                        %target_id,
                        skipped = skipped.len(),
                        "serials skipped during assignment: already bound elsewhere"
                    );
                }
            }
            Event::SerialsImported {
                buyer_part_number,
                created,
                skipped,
            } => {
                info!(%buyer_part_number, created, skipped, "serials imported");
            }
            other => info!(event = ?other, "engine event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (sender, rx) = channel(4);
        drop(rx);
        let result = sender
            .send(Event::PartNumberCreated {
                buyer_part_number: "BPN-1".into(),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (sender, mut rx) = channel(4);
        sender
            .send(Event::SerialsUnassigned {
                serial_ids: vec![Uuid::new_v4()],
            })
            .await
            .unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(Event::SerialsUnassigned { .. })
        ));
    }
}
