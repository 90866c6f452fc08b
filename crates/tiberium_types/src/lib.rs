//! This crate provides the file formats and codecs of the `tiberium-rs` project.
//!
//! # File Formats
//!
//! - **MIX**: Archive container indexed by a 32-bit hash of each file name
//! - **PAL**: 256-color VGA palette with 6-bit components
//! - **SHP**: Sprite animation, LCW and XOR-delta compressed frames
//! - **AUD**: Chunked audio stream, Westwood or IMA ADPCM
//!
//! # Output Formats
//!
//! - **PNG**: 8-bit RGBA images, see [`encode::png`]
//! - **WAV**: Linear PCM, see [`encode::wav`]
//! - Sprite sheets with a JSON sidecar, see [`encode::sheet`]
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use tiberium_types::prelude::*;
//!
//! # fn main() -> Result<(), TbFileError> {
//! let palette = Palette::load_or_grayscale("TEMPERAT.PAL").into_value();
//! let shp = ShpFile::open("E1.SHP")?;
//! let frames = shp.frames().into_value();
//!
//! let layout = SheetLayout::for_frames(
//!     u32::from(shp.width()),
//!     u32::from(shp.height()),
//!     frames.len() as u32,
//!     None,
//! );
//! let rgba = sheet::compose(&layout, &frames, &palette)?;
//! png::save("E1.png", layout.sheet_width(), layout.sheet_height(), &rgba)?;
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use tiberium_types::file::{aud, mix};
//!
//! # fn main() -> Result<(), tiberium_types::file::TbFileError> {
//! let mut archive = mix::File::open("SOUNDS.MIX")?;
//! let data = archive.extract_by_name("BOMBIT1.AUD")?;
//! aud::decode(&data)?.save_wav("BOMBIT1.wav")?;
//! # Ok(())
//! # }
//! ```

pub mod encode;
pub mod file;

/// `use tiberium_types::prelude::*;` to import commonly used items.
pub mod prelude;
