//! `.SHP` sprite animation support.
//!
//! # File Structure
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header (14 bytes)                      │
//! │   frames, x, y, width, height,         │
//! │   largest frame buffer, flags (u16 LE) │
//! ├────────────────────────────────────────┤
//! │ Frame table: (frames + 2) × 8 bytes    │
//! │   data offset (u24) + data format (u8) │
//! │   ref offset (u24)  + ref format (u8)  │
//! ├────────────────────────────────────────┤
//! │ Frame data                             │
//! └────────────────────────────────────────┘
//! ```
//!
//! Offsets are absolute within the file. Record `frames` holds the end of the
//! last frame's data; record `frames + 1` is padding.
//!
//! # Frame Formats
//!
//! | Tag    | Format                                                           |
//! |--------|------------------------------------------------------------------|
//! | `0x80` | [`lcw`] compressed, standalone                                   |
//! | `0x40` | [`xor_delta`] on top of the key frame at `ref_offset`            |
//! | `0x20` | [`xor_delta`] on top of the previous frame                       |
//!
//! Delta frames depend on earlier frames, so frames are decoded strictly in
//! order; [`File::frames`] does this and keeps every decoded frame so key
//! frames can be found by position.
//!
//! # Examples
//!
//! ```no_run
//! use tiberium_types::file::shp::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("E1.SHP")?;
//! let shp = File::from_bytes(data)?;
//! println!("{} frames of {}x{}", shp.frame_count(), shp.width(), shp.height());
//!
//! for (index, frame) in shp.frames().into_value().iter().enumerate() {
//!     println!("frame {index}: {} pixels", frame.len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod lcw;
pub mod xor_delta;

use std::{fmt, path::Path};

use log::{debug, warn};

use crate::file::{Fallback, FileType, Outcome, TbFileError};

pub use builder::Builder;

/// SHP file constants.
pub mod constants {
	/// Size of the fixed header
	pub const HEADER_SIZE: usize = 14;

	/// Size of one frame table record
	pub const RECORD_SIZE: usize = 8;

	/// Largest plausible frame count
	pub const MAX_FRAMES: u16 = 2000;

	/// Largest plausible frame width or height
	pub const MAX_DIMENSION: u16 = 1024;

	/// Largest offset a frame record can hold
	pub const MAX_OFFSET: u32 = 0x00FF_FFFF;
}

/// Frame data format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	/// Standalone LCW-compressed frame
	Lcw,
	/// XOR delta over the key frame named by the reference offset
	XorBase,
	/// XOR delta over the previous frame
	XorPrevious,
	/// Unrecognised tag, decoded as LCW
	Unknown(u8),
}

impl Format {
	/// Maps a raw tag to a format.
	pub fn from_u8(tag: u8) -> Self {
		match tag {
			0x80 => Self::Lcw,
			0x40 => Self::XorBase,
			0x20 => Self::XorPrevious,
			other => Self::Unknown(other),
		}
	}

	/// Raw tag value.
	pub fn to_u8(self) -> u8 {
		match self {
			Self::Lcw => 0x80,
			Self::XorBase => 0x40,
			Self::XorPrevious => 0x20,
			Self::Unknown(tag) => tag,
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Lcw => write!(f, "LCW"),
			Self::XorBase => write!(f, "XOR/base"),
			Self::XorPrevious => write!(f, "XOR/prev"),
			Self::Unknown(tag) => write!(f, "unknown(0x{tag:02X})"),
		}
	}
}

/// SHP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// Number of image frames
	pub frame_count: u16,
	/// X origin
	pub x: u16,
	/// Y origin
	pub y: u16,
	/// Frame width in pixels
	pub width: u16,
	/// Frame height in pixels
	pub height: u16,
	/// Size of the largest decompressed delta buffer
	pub largest_frame_size: u16,
	/// Header flags
	pub flags: u16,
}

impl Header {
	/// Parses and validates the header.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TbFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(TbFileError::insufficient_data(
				FileType::Shp,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let word = |i: usize| u16::from_le_bytes([data[i * 2], data[i * 2 + 1]]);
		let header = Self {
			frame_count: word(0),
			x: word(1),
			y: word(2),
			width: word(3),
			height: word(4),
			largest_frame_size: word(5),
			flags: word(6),
		};
		header.validate()?;
		Ok(header)
	}

	fn validate(&self) -> Result<(), TbFileError> {
		if self.frame_count == 0 || self.frame_count > constants::MAX_FRAMES {
			return Err(TbFileError::invalid_header(
				FileType::Shp,
				format!(
					"frame count {} out of range 1..={}",
					self.frame_count,
					constants::MAX_FRAMES
				),
			));
		}
		for (name, value) in [("width", self.width), ("height", self.height)] {
			if value == 0 || value > constants::MAX_DIMENSION {
				return Err(TbFileError::invalid_header(
					FileType::Shp,
					format!("{name} {value} out of range 1..={}", constants::MAX_DIMENSION),
				));
			}
		}
		Ok(())
	}

	/// Pixels per frame.
	pub fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// Bytes occupied by the header and frame table.
	pub fn table_end(&self) -> usize {
		constants::HEADER_SIZE + (self.frame_count as usize + 2) * constants::RECORD_SIZE
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"SHP {{ frames: {}, size: {}x{}, origin: ({}, {}), flags: 0x{:04X} }}",
			self.frame_count, self.width, self.height, self.x, self.y, self.flags
		)
	}
}

/// One frame table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameEntry {
	/// Absolute offset of the frame data (24 bits)
	pub data_offset: u32,
	/// Data format tag
	pub data_format: Format,
	/// Offset of the referenced key frame (24 bits)
	pub reference_offset: u32,
	/// Format tag of the referenced frame
	pub reference_format: u8,
}

impl FrameEntry {
	/// Parses an 8-byte record.
	pub fn from_bytes(record: &[u8; constants::RECORD_SIZE]) -> Self {
		let data = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
		let reference = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);
		Self {
			data_offset: data & 0x00FF_FFFF,
			data_format: Format::from_u8((data >> 24) as u8),
			reference_offset: reference & 0x00FF_FFFF,
			reference_format: (reference >> 24) as u8,
		}
	}

	/// Serializes the record.
	pub fn to_bytes(&self) -> [u8; constants::RECORD_SIZE] {
		let data = (self.data_offset & 0x00FF_FFFF) | (u32::from(self.data_format.to_u8()) << 24);
		let reference =
			(self.reference_offset & 0x00FF_FFFF) | (u32::from(self.reference_format) << 24);
		let mut out = [0u8; constants::RECORD_SIZE];
		out[..4].copy_from_slice(&data.to_le_bytes());
		out[4..].copy_from_slice(&reference.to_le_bytes());
		out
	}
}

impl fmt::Display for FrameEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} @ 0x{:06X} (ref 0x{:06X}/0x{:02X})",
			self.data_format, self.data_offset, self.reference_offset, self.reference_format
		)
	}
}

/// A parsed SHP image. Frames are decoded on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	raw: Vec<u8>,
	header: Header,
	/// `frame_count + 2` records
	entries: Vec<FrameEntry>,
}

impl File {
	/// Reads and parses an SHP file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TbFileError> {
		Self::from_bytes(std::fs::read(path)?)
	}

	/// Parses the header and frame table of `data`.
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, TbFileError> {
		let header = Header::from_bytes(&data)?;
		let table_end = header.table_end();
		if data.len() < table_end {
			return Err(TbFileError::insufficient_data(FileType::Shp, table_end, data.len()));
		}

		let entries = data[constants::HEADER_SIZE..table_end]
			.chunks_exact(constants::RECORD_SIZE)
			.map(|record| {
				let mut bytes = [0u8; constants::RECORD_SIZE];
				bytes.copy_from_slice(record);
				FrameEntry::from_bytes(&bytes)
			})
			.collect();
		debug!("{header}");

		Ok(Self {
			raw: data,
			header,
			entries,
		})
	}

	/// Returns the header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Number of image frames.
	pub fn frame_count(&self) -> usize {
		self.header.frame_count as usize
	}

	/// Frame width.
	pub fn width(&self) -> u16 {
		self.header.width
	}

	/// Frame height.
	pub fn height(&self) -> u16 {
		self.header.height
	}

	/// Image frame records (excludes the two trailing records).
	pub fn entries(&self) -> &[FrameEntry] {
		&self.entries[..self.frame_count()]
	}

	/// Compressed bytes of frame `index`, or `None` if its range is unusable.
	fn frame_data(&self, index: usize) -> Option<&[u8]> {
		let start = self.entries[index].data_offset as usize;
		let end = match self.entries[index + 1].data_offset as usize {
			0 => self.raw.len(),
			end => end.min(self.raw.len()),
		};
		(start >= self.header.table_end() && start <= end).then(|| &self.raw[start..end])
	}

	/// Decodes frame `index` given every frame decoded before it.
	///
	/// `decoded` must hold frames `0..index` in order; its last element is the
	/// previous frame. The result always has `width * height` bytes.
	pub fn decode_frame(&self, index: usize, decoded: &[Vec<u8>]) -> Outcome<Vec<u8>> {
		let size = self.header.pixel_count();
		if index >= self.frame_count() {
			return Outcome::Degraded {
				value: vec![0; size],
				fallback: Fallback::FrameOutOfBounds {
					frame: index,
				},
			};
		}

		let entry = self.entries[index];
		let Some(data) = self.frame_data(index) else {
			warn!("SHP frame {index}: data offset 0x{:06X} outside file", entry.data_offset);
			return Outcome::Degraded {
				value: decoded.last().cloned().unwrap_or_else(|| vec![0; size]),
				fallback: Fallback::FrameOutOfBounds {
					frame: index,
				},
			};
		};

		match entry.data_format {
			Format::Lcw => Outcome::Clean(lcw::decompress(data, size)),
			Format::XorBase | Format::XorPrevious => {
				let reference = self.reference_frame(index, decoded);
				let mut frame = reference.map_or_else(|| vec![0; size], <[u8]>::to_vec);
				frame.resize(size, 0);
				xor_delta::apply(data, &mut frame);
				Outcome::Clean(frame)
			}
			Format::Unknown(tag) => {
				warn!("SHP frame {index}: unknown format tag 0x{tag:02X}, decoding as LCW");
				Outcome::Degraded {
					value: lcw::decompress(data, size),
					fallback: Fallback::UnknownFormatTag {
						frame: index,
						tag,
					},
				}
			}
		}
	}

	/// Frame a delta at `index` applies to.
	fn reference_frame<'a>(&self, index: usize, decoded: &'a [Vec<u8>]) -> Option<&'a [u8]> {
		let entry = &self.entries[index];
		let decoded = &decoded[..index.min(decoded.len())];
		let previous = decoded.last().map(Vec::as_slice);
		if entry.data_format != Format::XorBase {
			return previous;
		}

		let base = self.entries[..decoded.len()]
			.iter()
			.position(|e| e.data_offset == entry.reference_offset)
			.map(|i| decoded[i].as_slice());
		if base.is_none() {
			debug!(
				"SHP frame {index}: no key frame at 0x{:06X}, using previous",
				entry.reference_offset
			);
		}
		base.or(previous)
	}

	/// Decodes every frame in order.
	///
	/// Degraded if any frame was; the first fallback is reported.
	pub fn frames(&self) -> Outcome<Vec<Vec<u8>>> {
		let mut frames: Vec<Vec<u8>> = Vec::with_capacity(self.frame_count());
		let mut first_fallback = None;

		for index in 0..self.frame_count() {
			let outcome = self.decode_frame(index, &frames);
			if let Outcome::Degraded {
				fallback,
				..
			} = &outcome && first_fallback.is_none()
			{
				first_fallback = Some(fallback.clone());
			}
			frames.push(outcome.into_value());
		}

		match first_fallback {
			None => Outcome::Clean(frames),
			Some(fallback) => Outcome::Degraded {
				value: frames,
				fallback,
			},
		}
	}
}
