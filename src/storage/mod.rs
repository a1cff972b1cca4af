//! Persistence of grass fields

pub mod disk_io;

pub use disk_io::{FieldData, FIELD_FILE_EXTENSION};
