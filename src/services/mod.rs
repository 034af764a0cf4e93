pub mod assignment;
pub mod hierarchy;
pub mod relationships;
pub mod serials;

pub use assignment::AssignmentService;
pub use hierarchy::HierarchyService;
pub use relationships::RelationshipService;
pub use serials::SerialService;
