//! `.AUD` audio stream support.
//!
//! # File Structure
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header (12 bytes)                       │
//! │   sample rate (u16), compressed (u32),  │
//! │   output size (u32), flags, codec (u8)  │
//! ├─────────────────────────────────────────┤
//! │ Chunk                                   │
//! │   compressed (u16), output (u16),       │
//! │   signature 0x0000DEAF (u32), payload   │
//! ├─────────────────────────────────────────┤
//! │ ...                                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The codec tag picks the sample format: [`ws_adpcm`] yields 8-bit unsigned
//! samples, [`ima_adpcm`] 16-bit signed ones. Decoders are reset at the
//! start of every chunk. A body without a single valid chunk header is
//! decoded as one headerless stream.
//!
//! The decoded stream is always exactly `output_size` bytes long; missing
//! samples are filled with silence.

pub mod constants;
pub mod ima_adpcm;
pub mod ws_adpcm;

use std::{fmt, io::Write, path::Path};

use log::{debug, warn};

use crate::file::{FileType, TbFileError};

use constants::*;

/// Compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
	/// Westwood ADPCM (tag 1)
	WsAdpcm,
	/// IMA ADPCM (tag 99)
	ImaAdpcm,
}

impl Codec {
	/// Maps a raw codec tag.
	pub fn from_u8(tag: u8) -> Option<Self> {
		match tag {
			CODEC_WS_ADPCM => Some(Self::WsAdpcm),
			CODEC_IMA_ADPCM => Some(Self::ImaAdpcm),
			_ => None,
		}
	}

	/// Raw codec tag.
	pub fn to_u8(self) -> u8 {
		match self {
			Self::WsAdpcm => CODEC_WS_ADPCM,
			Self::ImaAdpcm => CODEC_IMA_ADPCM,
		}
	}

	/// Bits per decoded sample.
	pub fn bits_per_sample(self) -> u16 {
		match self {
			Self::WsAdpcm => 8,
			Self::ImaAdpcm => 16,
		}
	}
}

impl fmt::Display for Codec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::WsAdpcm => write!(f, "WS ADPCM"),
			Self::ImaAdpcm => write!(f, "IMA ADPCM"),
		}
	}
}

/// AUD stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// Playback rate in Hz
	pub sample_rate: u16,
	/// Size of the chunked body
	pub compressed_size: u32,
	/// Size of the decoded stream in bytes
	pub output_size: u32,
	/// Raw flags byte
	pub flags: u8,
	/// Compression codec
	pub codec: Codec,
}

impl Header {
	/// Parses and validates the header.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TbFileError> {
		if data.len() < HEADER_SIZE {
			return Err(TbFileError::insufficient_data(FileType::Aud, HEADER_SIZE, data.len()));
		}

		let sample_rate = u16::from_le_bytes([data[0], data[1]]);
		if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
			return Err(TbFileError::invalid_header(
				FileType::Aud,
				format!(
					"sample rate {sample_rate} Hz out of range {MIN_SAMPLE_RATE}..={MAX_SAMPLE_RATE}"
				),
			));
		}

		let compressed_size = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
		let output_size = u32::from_le_bytes([data[6], data[7], data[8], data[9]]);
		if output_size > MAX_OUTPUT_SIZE {
			return Err(TbFileError::invalid_header(
				FileType::Aud,
				format!("output size {output_size} exceeds {MAX_OUTPUT_SIZE}"),
			));
		}

		let flags = data[10];
		let codec = Codec::from_u8(data[11]).ok_or_else(|| {
			TbFileError::invalid_header(FileType::Aud, format!("unknown codec tag {}", data[11]))
		})?;

		let header = Self {
			sample_rate,
			compressed_size,
			output_size,
			flags,
			codec,
		};
		if header.is_16bit() != (codec.bits_per_sample() == 16) {
			debug!("AUD: flags 0x{flags:02X} disagree with {codec}, using the codec's sample width");
		}
		Ok(header)
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut out = [0u8; HEADER_SIZE];
		out[0..2].copy_from_slice(&self.sample_rate.to_le_bytes());
		out[2..6].copy_from_slice(&self.compressed_size.to_le_bytes());
		out[6..10].copy_from_slice(&self.output_size.to_le_bytes());
		out[10] = self.flags;
		out[11] = self.codec.to_u8();
		out
	}

	/// Returns `true` if the stereo flag is set.
	pub fn is_stereo(&self) -> bool {
		self.flags & FLAG_STEREO != 0
	}

	/// Returns `true` if the 16-bit flag is set.
	pub fn is_16bit(&self) -> bool {
		self.flags & FLAG_16BIT != 0
	}

	/// Number of interleaved channels.
	pub fn channels(&self) -> u16 {
		if self.is_stereo() { 2 } else { 1 }
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"AUD {{ {} Hz, {} ch, {}, compressed: {}, output: {} }}",
			self.sample_rate,
			self.channels(),
			self.codec,
			self.compressed_size,
			self.output_size
		)
	}
}

/// Chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkHeader {
	/// Payload size
	pub compressed_size: u16,
	/// Decoded size in bytes
	pub output_size: u16,
	/// Must equal [`CHUNK_SIGNATURE`]
	pub signature: u32,
}

impl ChunkHeader {
	/// Reads a chunk header at the start of `data`.
	pub fn from_bytes(data: &[u8]) -> Option<Self> {
		let bytes = data.get(..CHUNK_HEADER_SIZE)?;
		Some(Self {
			compressed_size: u16::from_le_bytes([bytes[0], bytes[1]]),
			output_size: u16::from_le_bytes([bytes[2], bytes[3]]),
			signature: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
		})
	}

	/// Serializes the chunk header.
	pub fn to_bytes(&self) -> [u8; CHUNK_HEADER_SIZE] {
		let mut out = [0u8; CHUNK_HEADER_SIZE];
		out[0..2].copy_from_slice(&self.compressed_size.to_le_bytes());
		out[2..4].copy_from_slice(&self.output_size.to_le_bytes());
		out[4..8].copy_from_slice(&self.signature.to_le_bytes());
		out
	}

	/// Returns `true` if the signature matches.
	pub fn is_valid(&self) -> bool {
		self.signature == CHUNK_SIGNATURE
	}
}

/// Decoded, channel-interleaved samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
	/// 8-bit unsigned
	U8(Vec<u8>),
	/// 16-bit signed
	I16(Vec<i16>),
}

impl Samples {
	/// Number of samples across all channels.
	pub fn len(&self) -> usize {
		match self {
			Self::U8(samples) => samples.len(),
			Self::I16(samples) => samples.len(),
		}
	}

	/// Returns `true` if there are no samples.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Size of the samples in bytes.
	pub fn byte_len(&self) -> usize {
		match self {
			Self::U8(samples) => samples.len(),
			Self::I16(samples) => samples.len() * 2,
		}
	}

	/// Bits per sample.
	pub fn bits_per_sample(&self) -> u16 {
		match self {
			Self::U8(_) => 8,
			Self::I16(_) => 16,
		}
	}
}

/// A fully decoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
	/// Stream header
	pub header: Header,
	/// Decoded samples, exactly `header.output_size` bytes
	pub samples: Samples,
}

impl DecodedAudio {
	/// Playback rate in Hz.
	pub fn sample_rate(&self) -> u32 {
		u32::from(self.header.sample_rate)
	}

	/// Number of interleaved channels.
	pub fn channels(&self) -> u16 {
		self.header.channels()
	}

	/// Bits per sample.
	pub fn bits_per_sample(&self) -> u16 {
		self.samples.bits_per_sample()
	}

	/// Samples per channel.
	pub fn frames(&self) -> usize {
		self.samples.len() / self.channels() as usize
	}

	/// Playback duration in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		self.frames() as u64 * 1000 / u64::from(self.sample_rate())
	}

	/// Writes the samples as a WAV stream.
	pub fn write_wav<W: Write + std::io::Seek>(&self, writer: W) -> Result<(), TbFileError> {
		crate::encode::wav::write(writer, self.sample_rate(), self.channels(), &self.samples)
	}

	/// Writes the samples to a WAV file.
	pub fn save_wav(&self, path: impl AsRef<Path>) -> Result<(), TbFileError> {
		crate::encode::wav::save(path, self.sample_rate(), self.channels(), &self.samples)
	}
}

/// Parses the header of an AUD buffer.
pub fn parse_header(data: &[u8]) -> Result<Header, TbFileError> {
	Header::from_bytes(data)
}

/// Decodes a complete AUD buffer.
pub fn decode(data: &[u8]) -> Result<DecodedAudio, TbFileError> {
	let header = Header::from_bytes(data)?;
	debug!("{header}");
	let body = &data[HEADER_SIZE..];
	let channels = header.channels() as usize;
	let output_size = header.output_size as usize;

	let mut stream = Stream::new(header.codec, output_size);
	let mut pos = 0usize;
	let mut index = 0usize;

	while let Some(chunk) = ChunkHeader::from_bytes(&body[pos..]) {
		if !chunk.is_valid() {
			if index > 0 {
				debug!("AUD: no chunk signature at body offset {pos}, stopping");
			}
			break;
		}

		let start = pos + CHUNK_HEADER_SIZE;
		let available = body.len() - start;
		let expected = chunk.compressed_size as usize;
		if expected > available {
			return Err(TbFileError::TruncatedChunk {
				index,
				expected,
				available,
			});
		}

		let payload = &body[start..start + expected];
		debug!(
			"AUD chunk #{index}: {} -> {} bytes",
			chunk.compressed_size, chunk.output_size
		);
		stream.push_chunk(payload, chunk.output_size as usize, channels);
		pos = start + expected;
		index += 1;
	}

	if index == 0 {
		debug!("AUD: no chunk headers, decoding body as one stream");
		stream.push_chunk(body, output_size, channels);
	}

	Ok(DecodedAudio {
		header,
		samples: stream.finish(),
	})
}

/// Reads and decodes an AUD file.
pub fn open(path: impl AsRef<Path>) -> Result<DecodedAudio, TbFileError> {
	decode(&std::fs::read(path)?)
}

/// Decoded output accumulated chunk by chunk.
enum Stream {
	Ws {
		samples: Vec<u8>,
		limit: usize,
	},
	Ima {
		samples: Vec<i16>,
		limit: usize,
	},
}

impl Stream {
	fn new(codec: Codec, output_size: usize) -> Self {
		match codec {
			Codec::WsAdpcm => Self::Ws {
				samples: Vec::with_capacity(output_size),
				limit: output_size,
			},
			Codec::ImaAdpcm => Self::Ima {
				samples: Vec::with_capacity(output_size / 2),
				limit: output_size / 2,
			},
		}
	}

	fn push_chunk(&mut self, payload: &[u8], chunk_output: usize, channels: usize) {
		match self {
			Self::Ws {
				samples,
				limit,
			} => {
				let count = chunk_output.min(*limit - samples.len());
				if payload.len() == chunk_output {
					samples.extend_from_slice(&payload[..count]);
				} else {
					ws_adpcm::Decoder::new().decode(payload, count, samples);
				}
			}
			Self::Ima {
				samples,
				limit,
			} => {
				let count = (chunk_output / 2).min(*limit - samples.len());
				samples.extend(ima_adpcm::decode_chunk(payload, channels, count));
			}
		}
	}

	fn finish(self) -> Samples {
		match self {
			Self::Ws {
				mut samples,
				limit,
			} => {
				if samples.len() < limit {
					warn!("AUD: stream ended {} samples short, padding", limit - samples.len());
					samples.resize(limit, WS_MIDPOINT);
				}
				Samples::U8(samples)
			}
			Self::Ima {
				mut samples,
				limit,
			} => {
				if samples.len() < limit {
					warn!("AUD: stream ended {} samples short, padding", limit - samples.len());
					samples.resize(limit, 0);
				}
				Samples::I16(samples)
			}
		}
	}
}
