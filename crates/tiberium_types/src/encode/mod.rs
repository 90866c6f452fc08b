//! Encoders for the open output formats.

pub mod png;
pub mod sheet;
pub mod wav;

pub use sheet::{SheetLayout, SheetMetadata};
