use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TargetType;

/// Service-level error taxonomy for the assignment engine.
///
/// Conflict skips during batch assignment are deliberately *not* part of this
/// taxonomy: a serial already bound to a different target is reported back as
/// structured skip metadata on the command result, never thrown. The variants
/// here all mean "the whole operation was rejected".
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Overassignment: target {target_id} ({target_type}) holds {assigned} of {capacity}, cannot take {requested} more")]
    Overassignment {
        target_id: String,
        target_type: TargetType,
        capacity: u32,
        assigned: u32,
        requested: u32,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Maps validator output onto the validation variant, preserving the
    /// field-level messages for display.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(format!("Invalid input: {}", errors))
    }
}

/// Boundary error for the delimited-row import adapter. Raised before any
/// engine call is made, so a bad upload never touches the serial store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImportError {
    #[error("First column must be \"serialNumber\", got \"{0}\"")]
    InvalidHeader(String),

    #[error("Import data contains no header row")]
    MissingHeader,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overassignment_message_names_target_and_counts() {
        let err = ServiceError::Overassignment {
            target_id: "lot-001-A".into(),
            target_type: TargetType::Lot,
            capacity: 5,
            assigned: 3,
            requested: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("lot-001-A"));
        assert!(msg.contains("3 of 5"));
        assert!(msg.contains("4 more"));
    }
}
