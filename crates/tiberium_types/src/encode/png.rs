//! Minimal PNG writer.
//!
//! Emits 8-bit RGBA images with filter type 0 on every scanline. Image data
//! is wrapped in a zlib stream made of stored deflate blocks, so the output
//! is uncompressed but readable by any decoder.

use std::{
	fs,
	io::{BufWriter, Write},
	path::Path,
};

use crate::file::TbFileError;

/// PNG file signature
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest payload of one stored deflate block
const MAX_STORED_BLOCK: usize = 0xFFFF;

/// Largest data length of one chunk
const MAX_CHUNK_DATA: usize = 0x7FFF_FFFF;

/// Color type 6: truecolor with alpha
const COLOR_TYPE_RGBA: u8 = 6;

/// Adler-32 modulus
const ADLER_MOD: u32 = 65521;

/// Adler-32 checksum of `data`.
pub fn adler32(data: &[u8]) -> u32 {
	let (mut a, mut b) = (1u32, 0u32);
	// 5552 bytes is the longest run before `b` can overflow
	for block in data.chunks(5552) {
		for &byte in block {
			a += u32::from(byte);
			b += a;
		}
		a %= ADLER_MOD;
		b %= ADLER_MOD;
	}
	(b << 16) | a
}

/// Wraps `data` in a zlib stream of stored blocks.
pub fn zlib_stored(data: &[u8]) -> Vec<u8> {
	let blocks = data.len().div_ceil(MAX_STORED_BLOCK).max(1);
	let mut out = Vec::with_capacity(data.len() + blocks * 5 + 6);
	// CMF: deflate, 32K window; FLG: no dict, fastest, FCHECK so that CMF*256+FLG % 31 == 0
	out.extend_from_slice(&[0x78, 0x01]);

	let mut chunks = data.chunks(MAX_STORED_BLOCK).peekable();
	if chunks.peek().is_none() {
		out.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
	}
	while let Some(chunk) = chunks.next() {
		let last = chunks.peek().is_none();
		let len = chunk.len() as u16;
		out.push(u8::from(last));
		out.extend_from_slice(&len.to_le_bytes());
		out.extend_from_slice(&(!len).to_le_bytes());
		out.extend_from_slice(chunk);
	}

	out.extend_from_slice(&adler32(data).to_be_bytes());
	out
}

/// Writes one chunk: length, type, data and the CRC of type and data.
fn write_chunk<W: Write>(writer: &mut W, kind: &[u8; 4], data: &[u8]) -> Result<(), TbFileError> {
	let mut crc = crc32fast::Hasher::new();
	crc.update(kind);
	crc.update(data);

	writer.write_all(&(data.len() as u32).to_be_bytes())?;
	writer.write_all(kind)?;
	writer.write_all(data)?;
	writer.write_all(&crc.finalize().to_be_bytes())?;
	Ok(())
}

/// Encodes `rgba` (row-major, 4 bytes per pixel) as a PNG stream.
pub fn write<W: Write>(writer: W, width: u32, height: u32, rgba: &[u8]) -> Result<(), TbFileError> {
	write_split(writer, width, height, rgba, MAX_CHUNK_DATA)
}

/// Like [`write`], spreading the zlib stream over IDAT chunks of at most `max_idat` bytes.
fn write_split<W: Write>(
	mut writer: W,
	width: u32,
	height: u32,
	rgba: &[u8],
	max_idat: usize,
) -> Result<(), TbFileError> {
	let stride = width as usize * 4;
	let expected = stride * height as usize;
	if width == 0 || height == 0 {
		return Err(TbFileError::InvalidImage {
			message: format!("empty image {width}x{height}"),
		});
	}
	if rgba.len() != expected {
		return Err(TbFileError::InvalidImage {
			message: format!(
				"{width}x{height} RGBA needs {expected} bytes, got {} bytes",
				rgba.len()
			),
		});
	}

	let mut ihdr = Vec::with_capacity(13);
	ihdr.extend_from_slice(&width.to_be_bytes());
	ihdr.extend_from_slice(&height.to_be_bytes());
	ihdr.extend_from_slice(&[8, COLOR_TYPE_RGBA, 0, 0, 0]);

	let mut scanlines = Vec::with_capacity(expected + height as usize);
	for row in rgba.chunks_exact(stride) {
		scanlines.push(0);
		scanlines.extend_from_slice(row);
	}

	writer.write_all(&SIGNATURE)?;
	write_chunk(&mut writer, b"IHDR", &ihdr)?;
	for part in zlib_stored(&scanlines).chunks(max_idat) {
		write_chunk(&mut writer, b"IDAT", part)?;
	}
	write_chunk(&mut writer, b"IEND", &[])?;
	writer.flush()?;
	Ok(())
}

/// Encodes `rgba` into a PNG byte buffer.
pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, TbFileError> {
	let mut out = Vec::new();
	write(&mut out, width, height, rgba)?;
	Ok(out)
}

/// Encodes `rgba` to a PNG file at `path`.
pub fn save(path: impl AsRef<Path>, width: u32, height: u32, rgba: &[u8]) -> Result<(), TbFileError> {
	let file = BufWriter::new(fs::File::create(path)?);
	write(file, width, height, rgba)
}
