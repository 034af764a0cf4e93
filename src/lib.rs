//! SerialTrack API Library
//!
//! In-memory engine for tracking serialized inventory units through a
//! shipment-preparation workflow: serial creation (single, bulk, import),
//! assignment into items, lots, and packing units with capacity accounting,
//! and parent/child assembly linkage.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod errors;
pub mod events;
pub mod import;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

pub use config::{AppConfig, EngineConfig};
pub use errors::{ImportError, ServiceError};
pub use events::{Event, EventSender};
pub use models::{
    AsnHierarchy, AsnItem, AsnLot, AssignmentDetails, ChildComponent, PackingUnit,
    PackingUnitType, PartNumber, Serial, SerialStatus, TargetType,
};
pub use store::{AssignmentOutcome, AssignmentProgress, Datastore, SkippedAssignment};

/// The full service surface over one shared datastore.
///
/// All services hold the same `Datastore` instance; constructing them
/// together through this bundle is the supported way to guarantee that
/// assignment state and relationship state never diverge.
#[derive(Clone)]
pub struct AppServices {
    pub serials: services::SerialService,
    pub assignment: services::AssignmentService,
    pub relationships: services::RelationshipService,
    pub hierarchy: services::HierarchyService,
}

impl AppServices {
    pub fn new(store: Arc<Datastore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            serials: services::SerialService::new(store.clone(), event_sender.clone()),
            assignment: services::AssignmentService::new(store.clone(), event_sender.clone()),
            relationships: services::RelationshipService::new(
                store.clone(),
                event_sender.clone(),
            ),
            hierarchy: services::HierarchyService::new(store, event_sender),
        }
    }
}

/// Crate version, exposed for hosts embedding the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
