pub mod assign_serials_command;
pub mod bulk_create_serials_command;
pub mod create_serial_command;
pub mod import_serials_command;
pub mod link_child_serials_command;
pub mod set_child_components_command;
pub mod unassign_serials_command;

pub use assign_serials_command::{AssignSerialsCommand, AssignSerialsResult};
pub use bulk_create_serials_command::{BulkCreateSerialsCommand, BulkCreateSerialsResult};
pub use create_serial_command::{CreateSerialCommand, CreateSerialResult};
pub use import_serials_command::{ImportSerialsCommand, ImportSerialsResult, SerialRecord};
pub use link_child_serials_command::LinkChildSerialsCommand;
pub use set_child_components_command::{ChildComponentInput, SetChildComponentsCommand};
pub use unassign_serials_command::UnassignSerialsCommand;
