//! Prelude module for `tiberium_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use tiberium_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::grayscale();
//! assert_eq!(palette.to_rgba(0), [0, 0, 0, 0]);
//!
//! let key = name_hash("conquer.mix");
//! assert_eq!(key, name_hash("CONQUER.MIX"));
//! ```

// Re-export everything from tiberium_types::prelude
#[doc(inline)]
pub use tiberium_types::prelude::*;

// Re-export the entire tiberium_types module for advanced usage
#[doc(inline)]
pub use tiberium_types;
