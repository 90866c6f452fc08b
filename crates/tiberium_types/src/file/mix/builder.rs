//! Builder for writing `.MIX` archives.

use std::{io::Write, path::Path};

use crate::file::{FileType, TbFileError, hash};

use super::constants::MAX_ENTRIES;

/// Assembles a classic (flag-less) MIX archive in memory.
///
/// The index is written sorted by key, as the game's binary search expects;
/// bodies are laid out in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Builder {
	files: Vec<(u32, Vec<u8>)>,
}

impl Builder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a file under the hash of `name`, replacing any file with the same key.
	pub fn add(&mut self, name: &str, data: Vec<u8>) -> &mut Self {
		self.add_key(hash::hash(name), data)
	}

	/// Adds a file under a raw key, replacing any file with the same key.
	pub fn add_key(&mut self, key: u32, data: Vec<u8>) -> &mut Self {
		match self.files.iter_mut().find(|(k, _)| *k == key) {
			Some(slot) => slot.1 = data,
			None => self.files.push((key, data)),
		}
		self
	}

	/// Number of files added.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Returns `true` if nothing was added.
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Serializes the archive.
	///
	/// Fails if the index would be unreadable: no files, more than
	/// [`MAX_ENTRIES`] files, or a body past the 32-bit offset range.
	pub fn to_bytes(&self) -> Result<Vec<u8>, TbFileError> {
		let body_size: usize = self.files.iter().map(|(_, data)| data.len()).sum();
		let (count, body_size) = check_index(self.files.len(), body_size)?;

		let mut index = Vec::with_capacity(self.files.len());
		let mut offset = 0u32;
		for (key, data) in &self.files {
			// sizes sum to body_size, so neither can overflow
			index.push((*key, offset, data.len() as u32));
			offset += data.len() as u32;
		}
		index.sort_by_key(|(key, _, _)| *key);

		let mut out = Vec::with_capacity(6 + index.len() * 12 + body_size as usize);
		out.extend_from_slice(&count.to_le_bytes());
		out.extend_from_slice(&body_size.to_le_bytes());
		for (key, offset, size) in index {
			out.extend_from_slice(&key.to_le_bytes());
			out.extend_from_slice(&offset.to_le_bytes());
			out.extend_from_slice(&size.to_le_bytes());
		}
		for (_, data) in &self.files {
			out.extend_from_slice(data);
		}
		Ok(out)
	}

	/// Writes the archive to `writer`.
	pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), TbFileError> {
		writer.write_all(&self.to_bytes()?)?;
		Ok(())
	}

	/// Writes the archive to a file.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TbFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}
}

/// Narrows the entry count and body size to their header fields.
fn check_index(count: usize, body_size: usize) -> Result<(u16, u32), TbFileError> {
	let count = u16::try_from(count)
		.ok()
		.filter(|&c| c != 0 && c <= MAX_ENTRIES)
		.ok_or_else(|| {
			TbFileError::invalid_header(
				FileType::Mix,
				format!("entry count {count} out of range 1..={MAX_ENTRIES}"),
			)
		})?;
	let body_size = u32::try_from(body_size).map_err(|_| {
		TbFileError::invalid_header(
			FileType::Mix,
			format!("body of {body_size} bytes exceeds {} bytes", u32::MAX),
		)
	})?;
	Ok((count, body_size))
}
