//! `.MIX` archive support.
//!
//! A MIX archive bundles many assets behind a hash-keyed index. Filenames are
//! not stored; see [`crate::file::hash`] for how keys are derived.
//!
//! # File Structure
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │ [Flags (4 bytes, LE)]            │  only in the flags variant
//! ├──────────────────────────────────┤
//! │ Entry count (2 bytes, LE)        │
//! │ Body size (4 bytes, LE)          │
//! ├──────────────────────────────────┤
//! │ Index: count × 12-byte records   │
//! │   key (u32) offset (u32) size    │
//! ├──────────────────────────────────┤
//! │ Body                             │  offsets are relative to here
//! └──────────────────────────────────┘
//! ```
//!
//! The flags variant is detected by an implausible entry count (0 or above
//! [`constants::MAX_ENTRIES`]): the first four bytes are then a flags word and
//! the classic header starts right after it.
//!
//! # Examples
//!
//! ```no_run
//! use tiberium_types::file::{hash::NameIndex, mix::File};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut mix = File::open("CONQUER.MIX")?;
//! let names = NameIndex::global();
//!
//! for entry in mix.list().to_vec() {
//!     let data = mix.extract(&entry)?;
//!     println!("{}: {} bytes", names.name_for(entry.key), data.len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;

use std::{
	collections::HashMap,
	fmt,
	io::{BufReader, Read, Seek, SeekFrom},
	path::Path,
};

use log::{debug, warn};

use crate::file::{FileType, TbFileError, hash};

pub use builder::Builder;

/// MIX archive constants.
pub mod constants {
	/// Size of the classic header (count + body size)
	pub const HEADER_SIZE: usize = 6;

	/// Size of one index record
	pub const ENTRY_SIZE: usize = 12;

	/// Size of the optional flags word
	pub const FLAGS_SIZE: usize = 4;

	/// Largest plausible entry count
	pub const MAX_ENTRIES: u16 = 10_000;

	/// Flags bit: a SHA-1 digest trails the body
	pub const FLAG_CHECKSUM: u32 = 0x0001_0000;

	/// Flags bit: the index is encrypted
	pub const FLAG_ENCRYPTED: u32 = 0x0002_0000;
}

/// Parsed archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// Flags word, present only in the flags variant
	pub flags: Option<u32>,
	/// Number of index records
	pub count: u16,
	/// Declared body size in bytes
	pub body_size: u32,
}

impl Header {
	/// Total bytes before the body: flags word, classic header and index.
	pub fn size(&self) -> usize {
		let skip = if self.flags.is_some() {
			constants::FLAGS_SIZE
		} else {
			0
		};
		skip + constants::HEADER_SIZE + self.count as usize * constants::ENTRY_SIZE
	}

	/// Returns `true` if the flags word marks a trailing checksum.
	pub fn has_checksum(&self) -> bool {
		self.flags.is_some_and(|f| f & constants::FLAG_CHECKSUM != 0)
	}

	/// Returns `true` if the flags word marks an encrypted index.
	pub fn is_encrypted(&self) -> bool {
		self.flags.is_some_and(|f| f & constants::FLAG_ENCRYPTED != 0)
	}

	fn plausible(count: u16) -> bool {
		count != 0 && count <= constants::MAX_ENTRIES
	}

	/// Reads the header, detecting the flags variant.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TbFileError> {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		reader.read_exact(&mut buffer)?;

		let count = u16::from_le_bytes([buffer[0], buffer[1]]);
		let body_size = u32::from_le_bytes([buffer[2], buffer[3], buffer[4], buffer[5]]);
		if Self::plausible(count) {
			return Ok(Self {
				flags: None,
				count,
				body_size,
			});
		}

		// Flags variant: bytes 0..4 are the flags word, classic header follows.
		let flags = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
		let mut rest = [0u8; 4];
		reader.read_exact(&mut rest)?;
		let count = u16::from_le_bytes([buffer[4], buffer[5]]);
		let body_size = u32::from_le_bytes(rest);

		let header = Self {
			flags: Some(flags),
			count,
			body_size,
		};
		if !Self::plausible(count) {
			let hint = if header.is_encrypted() {
				" (index is encrypted)"
			} else {
				""
			};
			return Err(TbFileError::invalid_header(
				FileType::Mix,
				format!("entry count {count} out of range 1..={}{hint}", constants::MAX_ENTRIES),
			));
		}
		if header.is_encrypted() {
			warn!("MIX flags 0x{flags:08X} mark an encrypted index; parsing it as plain");
		}
		Ok(header)
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "MIX {{ entries: {}, body: {} bytes", self.count, self.body_size)?;
		if let Some(flags) = self.flags {
			write!(f, ", flags: 0x{flags:08X}")?;
		}
		write!(f, " }}")
	}
}

/// One archive index record, with an absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Filename hash
	pub key: u32,
	/// Absolute offset from the start of the archive
	pub offset: u32,
	/// Size in bytes
	pub size: u32,
}

impl Entry {
	/// Reads a record and converts its body-relative offset to absolute.
	fn from_reader<R: Read>(reader: &mut R, header_size: usize) -> Result<Self, TbFileError> {
		let mut buffer = [0u8; constants::ENTRY_SIZE];
		reader.read_exact(&mut buffer)?;
		let key = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
		let offset = u32::from_le_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]);
		let size = u32::from_le_bytes([buffer[8], buffer[9], buffer[10], buffer[11]]);

		let offset = offset.checked_add(header_size as u32).ok_or_else(|| {
			TbFileError::invalid_header(
				FileType::Mix,
				format!("entry {key:08X} offset 0x{offset:08X} overflows"),
			)
		})?;

		Ok(Self {
			key,
			offset,
			size,
		})
	}

	/// End offset (exclusive).
	pub fn end(&self) -> u64 {
		u64::from(self.offset) + u64::from(self.size)
	}
}

impl fmt::Display for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:08X} @ 0x{:08X} ({} bytes)", self.key, self.offset, self.size)
	}
}

/// An opened MIX archive.
#[derive(Debug)]
pub struct File<R> {
	reader: R,
	header: Header,
	file_len: u64,
	/// Entries sorted by offset
	entries: Vec<Entry>,
	/// Key to position in `entries`
	by_key: HashMap<u32, usize>,
}

impl<R: Read + Seek> File<R> {
	/// Parses the header and index from `reader`.
	pub fn from_reader(mut reader: R) -> Result<Self, TbFileError> {
		let file_len = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;

		let header = Header::from_reader(&mut reader)?;
		let header_size = header.size();
		if header_size as u64 > file_len {
			return Err(TbFileError::insufficient_data(
				FileType::Mix,
				header_size,
				file_len as usize,
			));
		}
		debug!("{header}, index ends at 0x{header_size:X}");

		let mut entries = Vec::with_capacity(header.count as usize);
		for _ in 0..header.count {
			entries.push(Entry::from_reader(&mut reader, header_size)?);
		}
		entries.sort_by_key(|e| e.offset);

		let mut by_key = HashMap::with_capacity(entries.len());
		for (position, entry) in entries.iter().enumerate() {
			if by_key.insert(entry.key, position).is_some() {
				return Err(TbFileError::invalid_header(
					FileType::Mix,
					format!("duplicate key {:08X}", entry.key),
				));
			}
			if entry.end() > file_len {
				warn!("entry {entry} runs past end of archive ({file_len} bytes)");
			}
		}

		Ok(Self {
			reader,
			header,
			file_len,
			entries,
			by_key,
		})
	}

	/// Returns the parsed header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Bytes before the body.
	pub fn header_size(&self) -> usize {
		self.header.size()
	}

	/// Declared body size.
	pub fn body_size(&self) -> u32 {
		self.header.body_size
	}

	/// Length of the underlying archive.
	pub fn file_len(&self) -> u64 {
		self.file_len
	}

	/// Entries in offset order.
	pub fn list(&self) -> &[Entry] {
		&self.entries
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the archive has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entry at `ordinal` in offset order.
	pub fn get(&self, ordinal: usize) -> Option<&Entry> {
		self.entries.get(ordinal)
	}

	/// Entry with the given key.
	pub fn find(&self, key: u32) -> Option<&Entry> {
		self.by_key.get(&key).map(|&position| &self.entries[position])
	}

	/// Entry whose key matches the hash of `name`.
	pub fn find_by_name(&self, name: &str) -> Option<&Entry> {
		self.find(hash::hash(name))
	}

	/// Reads exactly `entry.size` bytes at `entry.offset`.
	pub fn extract(&mut self, entry: &Entry) -> Result<Vec<u8>, TbFileError> {
		let available = self.file_len.saturating_sub(u64::from(entry.offset));
		if u64::from(entry.size) > available {
			return Err(TbFileError::TruncatedEntry {
				key: entry.key,
				expected: entry.size as usize,
				available: available as usize,
			});
		}

		self.reader.seek(SeekFrom::Start(u64::from(entry.offset)))?;
		let mut data = vec![0u8; entry.size as usize];
		self.reader.read_exact(&mut data)?;
		Ok(data)
	}

	/// Extracts the entry with the given key.
	pub fn extract_key(&mut self, key: u32) -> Result<Vec<u8>, TbFileError> {
		let entry = *self.find(key).ok_or_else(|| {
			TbFileError::entry_not_found(FileType::Mix, format!("key {key:08X}"))
		})?;
		self.extract(&entry)
	}

	/// Extracts the entry whose key matches the hash of `name`.
	pub fn extract_by_name(&mut self, name: &str) -> Result<Vec<u8>, TbFileError> {
		self.extract_key(hash::hash(name)).map_err(|e| match e {
			TbFileError::EntryNotFound {
				file_type,
				..
			} => TbFileError::entry_not_found(file_type, format!("name {name}")),
			other => other,
		})
	}

	/// Iterates over all entries in offset order, extracting each.
	///
	/// A failed entry yields its error and the walk continues.
	pub fn iter(&mut self) -> EntryIter<'_, R> {
		EntryIter {
			file: self,
			position: 0,
		}
	}
}

impl File<BufReader<std::fs::File>> {
	/// Opens a MIX archive from `path`.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TbFileError> {
		let file = std::fs::File::open(path)?;
		Self::from_reader(BufReader::new(file))
	}
}

/// Iterator over extracted entries.
pub struct EntryIter<'a, R> {
	file: &'a mut File<R>,
	position: usize,
}

impl<R: Read + Seek> Iterator for EntryIter<'_, R> {
	type Item = (Entry, Result<Vec<u8>, TbFileError>);

	fn next(&mut self) -> Option<Self::Item> {
		let entry = *self.file.entries.get(self.position)?;
		self.position += 1;
		Some((entry, self.file.extract(&entry)))
	}
}
