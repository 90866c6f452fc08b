//! Sprite sheet composition.
//!
//! Frames are laid out row-major on a grid of `columns × rows` cells, each
//! cell the size of one frame. Unused cells stay transparent.

use serde::{Deserialize, Serialize};

use crate::file::{TbFileError, pal::Palette};

/// Grid layout of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetLayout {
	/// Width of one frame
	pub frame_width: u32,
	/// Height of one frame
	pub frame_height: u32,
	/// Number of frames
	pub frame_count: u32,
	/// Cells per row
	pub columns: u32,
	/// Number of rows
	pub rows: u32,
}

impl SheetLayout {
	/// Lays out `frame_count` frames.
	///
	/// `columns` defaults to `ceil(sqrt(frame_count))` and is capped at the
	/// frame count.
	pub fn for_frames(
		frame_width: u32,
		frame_height: u32,
		frame_count: u32,
		columns: Option<u32>,
	) -> Self {
		let columns = columns
			.filter(|&c| c > 0)
			.unwrap_or_else(|| (frame_count as f64).sqrt().ceil() as u32)
			.clamp(1, frame_count.max(1));
		let rows = frame_count.div_ceil(columns).max(1);
		Self {
			frame_width,
			frame_height,
			frame_count,
			columns,
			rows,
		}
	}

	/// Sheet width in pixels.
	pub fn sheet_width(&self) -> u32 {
		self.frame_width * self.columns
	}

	/// Sheet height in pixels.
	pub fn sheet_height(&self) -> u32 {
		self.frame_height * self.rows
	}

	/// Top-left pixel of frame `index`.
	pub fn origin(&self, index: u32) -> (u32, u32) {
		(
			(index % self.columns) * self.frame_width,
			(index / self.columns) * self.frame_height,
		)
	}

	/// Sidecar description of this layout.
	pub fn metadata(&self) -> SheetMetadata {
		SheetMetadata {
			frame_width: self.frame_width,
			frame_height: self.frame_height,
			frame_count: self.frame_count,
			columns: self.columns,
			rows: self.rows,
			sheet_width: self.sheet_width(),
			sheet_height: self.sheet_height(),
		}
	}
}

/// JSON sidecar written next to every sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
	/// Width of one frame
	pub frame_width: u32,
	/// Height of one frame
	pub frame_height: u32,
	/// Number of frames
	pub frame_count: u32,
	/// Cells per row
	pub columns: u32,
	/// Number of rows
	pub rows: u32,
	/// Sheet width in pixels
	pub sheet_width: u32,
	/// Sheet height in pixels
	pub sheet_height: u32,
}

/// Blits every frame through `palette` into one RGBA buffer.
pub fn compose(
	layout: &SheetLayout,
	frames: &[Vec<u8>],
	palette: &Palette,
) -> Result<Vec<u8>, TbFileError> {
	if layout.frame_width == 0 || layout.frame_height == 0 {
		return Err(TbFileError::InvalidImage {
			message: format!("empty frame {}x{}", layout.frame_width, layout.frame_height),
		});
	}
	let frame_size = layout.frame_width as usize * layout.frame_height as usize;
	if let Some(frame) = frames.iter().find(|f| f.len() != frame_size) {
		return Err(TbFileError::InvalidImage {
			message: format!("frame has {} pixels, layout expects {frame_size}", frame.len()),
		});
	}
	if frames.len() > (layout.columns * layout.rows) as usize {
		return Err(TbFileError::InvalidImage {
			message: format!(
				"{} frames do not fit a {}x{} grid",
				frames.len(),
				layout.columns,
				layout.rows
			),
		});
	}

	let sheet_stride = layout.sheet_width() as usize * 4;
	let mut rgba = vec![0u8; sheet_stride * layout.sheet_height() as usize];

	for (index, frame) in frames.iter().enumerate() {
		let (x, y) = layout.origin(index as u32);
		for (row, pixels) in frame.chunks_exact(layout.frame_width as usize).enumerate() {
			let start = (y as usize + row) * sheet_stride + x as usize * 4;
			let line = &mut rgba[start..start + pixels.len() * 4];
			for (out, &pixel) in line.chunks_exact_mut(4).zip(pixels) {
				out.copy_from_slice(&palette.to_rgba(pixel));
			}
		}
	}

	Ok(rgba)
}
