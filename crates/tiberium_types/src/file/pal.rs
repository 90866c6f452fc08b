//! VGA palette support.
//!
//! Palette files hold 256 RGB triples (768 bytes) with 6-bit components
//! (0-63), as programmed into the VGA DAC. Components are expanded to 8 bits
//! with `round(v * 255 / 63)`.
//!
//! Index 0 is the transparency key by convention; nothing in the file marks
//! it.

use std::{fmt, io::Read, path::Path};

use log::warn;

use crate::file::{Fallback, Outcome, TbFileError};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates an opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates an opaque gray.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Expands a 6-bit VGA triple to 8 bits per channel.
	pub const fn from_vga(r: u8, g: u8, b: u8) -> Self {
		Self::rgb(expand_6bit(r), expand_6bit(g), expand_6bit(b))
	}

	/// Returns the components as `[r, g, b, a]`.
	pub const fn to_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Expands a 6-bit component to 8 bits, rounding to nearest.
///
/// Values above 63 are clamped first.
pub const fn expand_6bit(value: u8) -> u8 {
	let v = if value > 63 {
		63
	} else {
		value
	} as u16;
	((v * 255 + 31) / 63) as u8
}

/// 256-color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Number of colors
	pub const COLOR_COUNT: usize = 256;

	/// Size of a palette file in bytes
	pub const FILE_SIZE: usize = Self::COLOR_COUNT * 3;

	/// Index reserved as transparent
	pub const TRANSPARENT_INDEX: u8 = 0;

	/// Loads a palette file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, TbFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a palette file, falling back to [`Palette::grayscale`] on any failure.
	pub fn load_or_grayscale(path: impl AsRef<Path>) -> Outcome<Self> {
		let path = path.as_ref();
		match Self::load(path) {
			Ok(palette) => Outcome::Clean(palette),
			Err(e) => {
				warn!("cannot load palette {}: {e}; using grayscale", path.display());
				Outcome::Degraded {
					value: Self::grayscale(),
					fallback: Fallback::MissingPalette {
						reason: e.to_string(),
					},
				}
			}
		}
	}

	/// Parses 768 bytes of 6-bit RGB triples. Trailing bytes are ignored.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TbFileError> {
		if data.len() < Self::FILE_SIZE {
			return Err(TbFileError::InvalidPalette {
				expected: Self::FILE_SIZE,
				actual: data.len(),
			});
		}

		let mut colors = [Color::default(); 256];
		for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
			*color = Color::from_vga(rgb[0], rgb[1], rgb[2]);
		}
		Ok(Self {
			colors,
		})
	}

	/// Reads a palette from `reader`.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TbFileError> {
		let mut data = Vec::with_capacity(Self::FILE_SIZE);
		reader.take(Self::FILE_SIZE as u64).read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Grayscale ramp where each index maps to its own gray level.
	pub fn grayscale() -> Self {
		let mut colors = [Color::default(); 256];
		for (i, color) in colors.iter_mut().enumerate() {
			*color = Color::gray(i as u8);
		}
		Self {
			colors,
		}
	}

	/// Returns `true` exactly for the transparency index.
	#[inline]
	pub fn is_transparent(index: u8) -> bool {
		index == Self::TRANSPARENT_INDEX
	}

	/// Color stored at `index`.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Color to emit for a pixel: the stored color, or fully transparent for index 0.
	#[inline]
	pub fn to_rgba(&self, index: u8) -> [u8; 4] {
		if Self::is_transparent(index) {
			[0, 0, 0, 0]
		} else {
			self.colors[index as usize].to_array()
		}
	}

	/// All colors.
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}

	/// Derives a palette where each `(index, source)` pair makes `index`
	/// borrow the color of `source`. Unlisted indices are unchanged.
	///
	/// Sources are read from `self`, so chained pairs never cascade.
	pub fn remap<'a, I>(&self, table: I) -> Self
	where
		I: IntoIterator<Item = &'a (u8, u8)>,
	{
		let mut remapped = self.clone();
		for &(index, source) in table {
			remapped.colors[index as usize] = self.colors[source as usize];
		}
		remapped
	}

	/// Expands an index buffer to RGBA.
	pub fn apply(&self, pixels: &[u8]) -> Vec<u8> {
		let mut rgba = Vec::with_capacity(pixels.len() * 4);
		for &index in pixels {
			rgba.extend_from_slice(&self.to_rgba(index));
		}
		rgba
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::grayscale()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
