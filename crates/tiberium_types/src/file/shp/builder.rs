//! Builder for writing `.SHP` files.

use std::path::Path;

use crate::file::{FileType, TbFileError};

use super::{
	Format, FrameEntry, Header,
	constants::{HEADER_SIZE, MAX_FRAMES, MAX_OFFSET, RECORD_SIZE},
	lcw,
};

/// Writes SHP files where every frame is a standalone LCW frame.
#[derive(Debug, Clone)]
pub struct Builder {
	width: u16,
	height: u16,
	frames: Vec<Vec<u8>>,
}

impl Builder {
	/// Creates a builder for frames of `width` × `height` pixels.
	pub fn new(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			frames: Vec::new(),
		}
	}

	/// Appends a frame of palette indices.
	pub fn add_frame(&mut self, pixels: Vec<u8>) -> Result<&mut Self, TbFileError> {
		let expected = self.width as usize * self.height as usize;
		if pixels.len() != expected {
			return Err(TbFileError::insufficient_data(FileType::Shp, expected, pixels.len()));
		}
		if self.frames.len() >= MAX_FRAMES as usize {
			return Err(TbFileError::invalid_header(
				FileType::Shp,
				format!("more than {MAX_FRAMES} frames"),
			));
		}
		self.frames.push(pixels);
		Ok(self)
	}

	/// Serializes the file.
	pub fn to_bytes(&self) -> Result<Vec<u8>, TbFileError> {
		let header = Header {
			frame_count: self.frames.len() as u16,
			x: 0,
			y: 0,
			width: self.width,
			height: self.height,
			largest_frame_size: 0,
			flags: 0,
		};
		header.validate()?;

		let payloads: Vec<Vec<u8>> = self.frames.iter().map(|f| lcw::compress(f)).collect();

		let mut out = Vec::new();
		for word in [
			header.frame_count,
			header.x,
			header.y,
			header.width,
			header.height,
			header.largest_frame_size,
			header.flags,
		] {
			out.extend_from_slice(&word.to_le_bytes());
		}
		debug_assert_eq!(out.len(), HEADER_SIZE);

		let mut offset = header.table_end();
		for payload in &payloads {
			let entry = FrameEntry {
				data_offset: frame_offset(offset)?,
				data_format: Format::Lcw,
				reference_offset: 0,
				reference_format: 0,
			};
			out.extend_from_slice(&entry.to_bytes());
			offset += payload.len();
		}
		out.extend_from_slice(&frame_offset(offset)?.to_le_bytes());
		out.extend_from_slice(&[0u8; 4]);
		out.extend_from_slice(&[0u8; RECORD_SIZE]);

		for payload in payloads {
			out.extend_from_slice(&payload);
		}
		Ok(out)
	}

	/// Writes the file to `path`.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TbFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}
}

/// Checks that `offset` fits the 24-bit offset field of a frame record.
fn frame_offset(offset: usize) -> Result<u32, TbFileError> {
	u32::try_from(offset).ok().filter(|&o| o <= MAX_OFFSET).ok_or_else(|| {
		TbFileError::invalid_header(
			FileType::Shp,
			format!("frame data at offset {offset} exceeds 0x{MAX_OFFSET:06X}"),
		)
	})
}

#[cfg(test)]
mod tests {
	use rand::{Rng, SeedableRng, rngs::SmallRng};

	use super::{super::File, *};

	#[test]
	fn test_builder_output_parses() {
		let mut builder = Builder::new(3, 2);
		builder.add_frame(vec![0, 0, 0, 1, 2, 3]).unwrap();
		builder.add_frame(vec![5; 6]).unwrap();
		let shp = File::from_bytes(builder.to_bytes().unwrap()).unwrap();

		assert_eq!(shp.frame_count(), 2);
		assert_eq!((shp.width(), shp.height()), (3, 2));
		assert!(shp.entries().iter().all(|e| e.data_format == Format::Lcw));
		assert_eq!(shp.frames().into_value(), vec![vec![0, 0, 0, 1, 2, 3], vec![5; 6]]);
	}

	#[test]
	fn test_builder_rejects_bad_frames() {
		let mut builder = Builder::new(2, 2);
		assert!(builder.add_frame(vec![1, 2, 3]).is_err());
		assert!(builder.to_bytes().is_err());
	}

	#[test]
	fn test_offset_must_fit_24_bits() {
		assert_eq!(frame_offset(0xFF_FFFF).unwrap(), 0xFF_FFFF);
		let err = frame_offset(0x100_0000).unwrap_err();
		assert!(matches!(
			err,
			TbFileError::InvalidHeader {
				file_type: FileType::Shp,
				..
			}
		));
		assert!(err.to_string().contains("0xFFFFFF"));
	}

	#[test]
	fn test_oversized_sprite_rejected() {
		// incompressible 1024x1024 frames overflow the offset field after 16 frames
		let mut rng = SmallRng::seed_from_u64(24);
		let mut builder = Builder::new(1024, 1024);
		for _ in 0..17 {
			let mut frame = vec![0u8; 1024 * 1024];
			rng.fill(&mut frame[..]);
			builder.add_frame(frame).unwrap();
		}
		assert!(matches!(builder.to_bytes(), Err(TbFileError::InvalidHeader { .. })));
	}
}
