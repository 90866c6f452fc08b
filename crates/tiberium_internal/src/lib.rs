//! This module is separated into its own crate to enable simple dynamic linking for `tiberium`, and should not be used directly.

/// `use tiberium::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export tiberium_types for convenience
pub use tiberium_types;

// Re-export commonly used types at crate root
pub use tiberium_types::{
	encode,
	file::{self, MixFile, Palette, ShpFile, TbFileError},
};
