use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registry entry mapping a buyer-facing part identifier to descriptive
/// metadata. Entries are created by catalog seeding or explicit user action
/// and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartNumber {
    pub id: Uuid,
    /// Unique key within the registry.
    pub buyer_part_number: String,
    pub name: String,
    pub description: Option<String>,
}

impl PartNumber {
    pub fn new(
        buyer_part_number: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            buyer_part_number: buyer_part_number.into(),
            name: name.into(),
            description,
        }
    }
}
