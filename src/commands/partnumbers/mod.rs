pub mod create_part_number_command;

pub use create_part_number_command::{CreatePartNumberCommand, CreatePartNumberResult};
