//! WAV output through `hound`.
//!
//! 8-bit samples are stored unsigned and 16-bit samples little-endian
//! signed, as the WAV format requires.

use std::{
	fs,
	io::{BufWriter, Seek, Write},
	path::Path,
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::file::{TbFileError, aud::Samples};

/// Builds the format block for the given stream.
pub fn spec(sample_rate: u32, channels: u16, bits_per_sample: u16) -> WavSpec {
	WavSpec {
		channels,
		sample_rate,
		bits_per_sample,
		sample_format: SampleFormat::Int,
	}
}

/// Writes `samples` as a complete WAV stream.
pub fn write<W: Write + Seek>(
	writer: W,
	sample_rate: u32,
	channels: u16,
	samples: &Samples,
) -> Result<(), TbFileError> {
	let mut wav = WavWriter::new(writer, spec(sample_rate, channels, samples.bits_per_sample()))?;
	// a trailing partial frame is completed with silence
	let padding = samples.len().next_multiple_of(channels.max(1) as usize) - samples.len();
	match samples {
		Samples::U8(samples) => {
			// hound stores i8 samples offset by 128
			for &sample in samples {
				wav.write_sample((sample ^ 0x80) as i8)?;
			}
			for _ in 0..padding {
				wav.write_sample(0i8)?;
			}
		}
		Samples::I16(samples) => {
			for &sample in samples {
				wav.write_sample(sample)?;
			}
			for _ in 0..padding {
				wav.write_sample(0i16)?;
			}
		}
	}
	wav.finalize()?;
	Ok(())
}

/// Writes `samples` to a WAV file at `path`.
pub fn save(
	path: impl AsRef<Path>,
	sample_rate: u32,
	channels: u16,
	samples: &Samples,
) -> Result<(), TbFileError> {
	let file = BufWriter::new(fs::File::create(path)?);
	write(file, sample_rate, channels, samples)
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn round_trip(samples: &Samples, channels: u16) -> hound::WavReader<Cursor<Vec<u8>>> {
		let mut buffer = Cursor::new(Vec::new());
		write(&mut buffer, 11025, channels, samples).unwrap();
		hound::WavReader::new(Cursor::new(buffer.into_inner())).unwrap()
	}

	#[test]
	fn test_u8_stored_unsigned() {
		let mut buffer = Cursor::new(Vec::new());
		write(&mut buffer, 11025, 1, &Samples::U8(vec![0, 128, 255, 7])).unwrap();
		let bytes = buffer.into_inner();
		assert_eq!(&bytes[..4], b"RIFF");
		assert_eq!(&bytes[8..12], b"WAVE");
		assert_eq!(&bytes[bytes.len() - 4..], &[0, 128, 255, 7]);
	}

	#[test]
	fn test_format_block() {
		let reader = round_trip(&Samples::I16(vec![-32768, 0, 32767, 1]), 2);
		let spec = reader.spec();
		assert_eq!(spec.channels, 2);
		assert_eq!(spec.sample_rate, 11025);
		assert_eq!(spec.bits_per_sample, 16);
		assert_eq!(reader.duration(), 2);
		let samples: Vec<i16> = reader.into_samples().map(Result::unwrap).collect();
		assert_eq!(samples, vec![-32768, 0, 32767, 1]);
	}

	#[test]
	fn test_partial_frame_is_padded() {
		let reader = round_trip(&Samples::U8(vec![200, 100, 50]), 2);
		assert_eq!(reader.duration(), 2);
		let samples: Vec<i8> = reader.into_samples().map(Result::unwrap).collect();
		assert_eq!(samples, vec![72, -28, -78, 0]);
	}

	#[test]
	fn test_byte_rate_and_block_align() {
		let mut buffer = Cursor::new(Vec::new());
		write(&mut buffer, 22050, 2, &Samples::I16(vec![0; 4])).unwrap();
		let bytes = buffer.into_inner();
		let byte_rate = u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]);
		let block_align = u16::from_le_bytes([bytes[32], bytes[33]]);
		assert_eq!(byte_rate, 22050 * 4);
		assert_eq!(block_align, 4);
	}
}
