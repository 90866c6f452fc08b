//! Westwood ADPCM, 8-bit unsigned output.
//!
//! Each input byte carries a 2-bit command in its top bits and a 6-bit
//! operand `n`:
//!
//! | Command | Effect                                                          |
//! |---------|-----------------------------------------------------------------|
//! | `0`     | `n + 1` bytes follow, each holding four 2-bit deltas            |
//! | `1`     | `n + 1` bytes follow, each holding two 4-bit deltas             |
//! | `2`     | bit 5 set: add the signed 5-bit delta in `n` once               |
//! |         | bit 5 clear: `n + 1` raw samples follow                         |
//! | `3`     | repeat the current sample `n + 1` times                         |
//!
//! Packed deltas are consumed low bits first. The running sample starts at
//! 128 and is clamped to `0..=255` after every delta.

use super::constants::WS_MIDPOINT;

/// Deltas for 2-bit codes
const STEP_2BIT: [i16; 4] = [-2, -1, 0, 1];

/// Deltas for 4-bit codes
const STEP_4BIT: [i16; 16] = [-9, -8, -6, -5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6, 8];

/// Running state of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
	sample: u8,
}

impl Default for Decoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Decoder {
	/// Decoder positioned at the midpoint sample.
	pub const fn new() -> Self {
		Self {
			sample: WS_MIDPOINT,
		}
	}

	/// Current sample value.
	pub fn sample(&self) -> u8 {
		self.sample
	}

	#[inline]
	fn step(&mut self, delta: i16) -> u8 {
		self.sample = (i16::from(self.sample) + delta).clamp(0, 255) as u8;
		self.sample
	}

	/// Decodes `input`, appending at most `limit` samples to `out`.
	///
	/// Returns the number of samples appended.
	pub fn decode(&mut self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> usize {
		let start = out.len();
		let end = start + limit;
		let mut src = input.iter().copied();

		while out.len() < end {
			let Some(byte) = src.next() else {
				break;
			};
			let n = byte & 0x3F;

			match byte >> 6 {
				0 => {
					for packed in src.by_ref().take(n as usize + 1) {
						for shift in [0, 2, 4, 6] {
							if out.len() >= end {
								break;
							}
							let sample = self.step(STEP_2BIT[((packed >> shift) & 0x03) as usize]);
							out.push(sample);
						}
					}
				}
				1 => {
					for packed in src.by_ref().take(n as usize + 1) {
						for shift in [0, 4] {
							if out.len() >= end {
								break;
							}
							let sample = self.step(STEP_4BIT[((packed >> shift) & 0x0F) as usize]);
							out.push(sample);
						}
					}
				}
				2 if n & 0x20 != 0 => {
					let delta = (((n & 0x1F) << 3) as i8) >> 3;
					let sample = self.step(i16::from(delta));
					out.push(sample);
				}
				2 => {
					for raw in src.by_ref().take(n as usize + 1) {
						if out.len() >= end {
							break;
						}
						self.sample = raw;
						out.push(raw);
					}
				}
				_ => {
					let count = (n as usize + 1).min(end - out.len());
					out.extend(std::iter::repeat_n(self.sample, count));
				}
			}
		}

		out.len() - start
	}
}

/// Decodes one chunk with a fresh decoder.
pub fn decode_chunk(input: &[u8], output_size: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(output_size);
	Decoder::new().decode(input, output_size, &mut out);
	out
}
