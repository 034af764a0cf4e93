use crate::{errors::ServiceError, events::EventSender, store::Datastore};
use async_trait::async_trait;
use std::sync::Arc;

/// Command trait for implementing the Command Pattern
///
/// Each mutating engine operation is encapsulated as a command object that
/// can be validated, executed against the shared datastore, and publish a
/// domain event. Commands apply their entire effect before returning; no
/// observer can see a half-applied batch.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command against the shared datastore
    ///
    /// # Arguments
    /// * `store` - The engine's canonical serial store, registry, and catalog
    /// * `event_sender` - Channel to publish domain events
    async fn execute(
        &self,
        store: Arc<Datastore>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError>;
}

pub mod partnumbers;
pub mod serials;
