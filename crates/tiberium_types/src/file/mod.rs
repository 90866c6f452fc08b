//! File type support for `tiberium-rs` project.

mod error;

pub mod aud;
pub mod hash;
pub mod mix;
pub mod pal;
pub mod shp;

// Re-export unified error type
pub use error::{Fallback, FileType, Outcome, TbFileError};

// Re-export main file types
pub use aud::{
	Codec as AudCodec, DecodedAudio, Header as AudHeader, Samples as AudSamples,
	decode as decode_aud,
};
pub use hash::{NameIndex, hash as name_hash, placeholder_name};
pub use mix::{Builder as MixBuilder, Entry as MixEntry, File as MixFile, Header as MixHeader};
pub use pal::{Color, Palette};
pub use shp::{
	Builder as ShpBuilder, File as ShpFile, Format as ShpFormat, FrameEntry as ShpFrameEntry,
	Header as ShpHeader,
};
