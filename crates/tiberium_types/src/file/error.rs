//! Error types for file format parsing and conversion.

use std::fmt;

use thiserror::Error;

/// File types handled by the pipeline, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.MIX` archive container
	Mix,
	/// 768-byte VGA palette
	Pal,
	/// `.SHP` sprite animation
	Shp,
	/// `.AUD` ADPCM audio stream
	Aud,
	/// PNG output container
	Png,
	/// WAV output container
	Wav,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Mix => write!(f, "MIX"),
			Self::Pal => write!(f, "PAL"),
			Self::Shp => write!(f, "SHP"),
			Self::Aud => write!(f, "AUD"),
			Self::Png => write!(f, "PNG"),
			Self::Wav => write!(f, "WAV"),
		}
	}
}

/// Unified error type for every format in this crate.
#[derive(Debug, Error)]
pub enum TbFileError {
	/// File missing or unreadable
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// A structural header field is outside its plausible range
	#[error("[{file_type}] invalid header: {message}")]
	InvalidHeader {
		/// Format being parsed
		file_type: FileType,
		/// The check that failed
		message: String,
	},

	/// Not enough data for a fixed-size layout
	#[error("[{file_type}] insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Number of bytes required
		expected: usize,
		/// Number of bytes present
		actual: usize,
	},

	/// An archive entry declares more bytes than the archive holds
	#[error(
		"[MIX] truncated entry {key:08X}: declares {expected} bytes, only {available} bytes available"
	)]
	TruncatedEntry {
		/// Hash key of the entry
		key: u32,
		/// Declared size
		expected: usize,
		/// Bytes actually readable
		available: usize,
	},

	/// An audio chunk declares more payload than the stream holds
	#[error(
		"[AUD] truncated chunk #{index}: declares {expected} bytes, only {available} bytes available"
	)]
	TruncatedChunk {
		/// Ordinal of the chunk in the stream
		index: usize,
		/// Declared payload size
		expected: usize,
		/// Bytes actually remaining
		available: usize,
	},

	/// Palette file shorter than 256 RGB triples
	#[error("[PAL] invalid palette: expected at least {expected} bytes, got {actual} bytes")]
	InvalidPalette {
		/// Required size
		expected: usize,
		/// Actual size
		actual: usize,
	},

	/// Lookup by key, name or ordinal failed
	#[error("[{file_type}] entry not found: {message}")]
	EntryNotFound {
		/// Format being queried
		file_type: FileType,
		/// What was looked up
		message: String,
	},

	/// Encoder input is inconsistent with the declared geometry
	#[error("[PNG] invalid image: {message}")]
	InvalidImage {
		/// Description of the mismatch
		message: String,
	},

	/// WAV writer failure
	#[error("[WAV] {0}")]
	Wav(#[from] hound::Error),
}

impl TbFileError {
	/// Creates an [`TbFileError::InvalidHeader`].
	pub fn invalid_header(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidHeader {
			file_type,
			message: message.into(),
		}
	}

	/// Creates an [`TbFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`TbFileError::EntryNotFound`].
	pub fn entry_not_found(file_type: FileType, message: impl Into<String>) -> Self {
		Self::EntryNotFound {
			file_type,
			message: message.into(),
		}
	}

	/// Returns `true` if the error only affects one entry/chunk and a batch may continue.
	pub fn is_entry_local(&self) -> bool {
		matches!(self, Self::TruncatedEntry { .. } | Self::TruncatedChunk { .. })
	}
}

/// Non-fatal conditions that downgrade a result instead of failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
	/// A frame carried a format tag no decoder recognises; the direct decoder was used
	UnknownFormatTag {
		/// Frame index
		frame: usize,
		/// The unrecognised tag
		tag: u8,
	},

	/// A frame's data range lies partly or wholly outside the buffer
	FrameOutOfBounds {
		/// Frame index
		frame: usize,
	},

	/// Palette could not be loaded; the grayscale palette was used
	MissingPalette {
		/// Why loading failed
		reason: String,
	},
}

impl fmt::Display for Fallback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnknownFormatTag {
				frame,
				tag,
			} => write!(f, "frame {frame}: unknown format tag 0x{tag:02X}, decoded as LCW"),
			Self::FrameOutOfBounds {
				frame,
			} => write!(f, "frame {frame}: data range outside buffer"),
			Self::MissingPalette {
				reason,
			} => write!(f, "palette unavailable ({reason}), using grayscale"),
		}
	}
}

/// Tagged result for operations that can degrade gracefully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
	/// Produced without any fallback
	Clean(T),
	/// Produced, but at least one fallback was taken
	Degraded {
		/// Best-effort value
		value: T,
		/// The first fallback taken
		fallback: Fallback,
	},
}

impl<T> Outcome<T> {
	/// Returns the value regardless of degradation.
	pub fn into_value(self) -> T {
		match self {
			Self::Clean(value)
			| Self::Degraded {
				value,
				..
			} => value,
		}
	}

	/// Borrows the value regardless of degradation.
	pub fn value(&self) -> &T {
		match self {
			Self::Clean(value)
			| Self::Degraded {
				value,
				..
			} => value,
		}
	}

	/// Returns the fallback taken, if any.
	pub fn fallback(&self) -> Option<&Fallback> {
		match self {
			Self::Clean(_) => None,
			Self::Degraded {
				fallback,
				..
			} => Some(fallback),
		}
	}

	/// Returns `true` if no fallback was taken.
	pub fn is_clean(&self) -> bool {
		matches!(self, Self::Clean(_))
	}

	/// Maps the carried value, keeping the tag.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
		match self {
			Self::Clean(value) => Outcome::Clean(f(value)),
			Self::Degraded {
				value,
				fallback,
			} => Outcome::Degraded {
				value: f(value),
				fallback,
			},
		}
	}
}
