//! Prelude module for `tiberium_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use tiberium_types::prelude::*;
//!
//! let index = NameIndex::global();
//! println!("{}", index.name_for(name_hash("RULES.INI")));
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// AUD types
	AudCodec,
	AudHeader,
	AudSamples,
	// Palette types
	Color,
	DecodedAudio,
	// Error types
	Fallback,
	FileType,

	// MIX types
	MixBuilder,
	MixEntry,
	MixFile,
	MixHeader,

	// Name hashing
	NameIndex,
	Outcome,
	Palette,

	// SHP types
	ShpBuilder,
	ShpFile,
	ShpFormat,
	ShpFrameEntry,
	ShpHeader,
	TbFileError,

	decode_aud,
	name_hash,
	placeholder_name,
};

// Encoders
#[doc(inline)]
pub use crate::encode::{SheetLayout, SheetMetadata, png, sheet, wav};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
