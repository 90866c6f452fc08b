//! IMA ADPCM, 16-bit signed output.

use super::constants::STEP_TABLE_ENTRIES;

/// IMA ADPCM index adjustment table
const INDEX_TABLE: [i8; 16] = [-1, -1, -1, -1, 2, 4, 6, 8, -1, -1, -1, -1, 2, 4, 6, 8];

/// IMA ADPCM step table
const STEP_TABLE: [i16; STEP_TABLE_ENTRIES] = [
	7, 8, 9, 10, 11, 12, 13, 14, 16, 17, 19, 21, 23, 25, 28, 31, 34, 37, 41, 45, 50, 55, 60, 66,
	73, 80, 88, 97, 107, 118, 130, 143, 157, 173, 190, 209, 230, 253, 279, 307, 337, 371, 408,
	449, 494, 544, 598, 658, 724, 796, 876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
	2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358, 5894, 6484, 7132, 7845, 8630,
	9493, 10442, 11487, 12635, 13899, 15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794,
	32767,
];

/// Predictor state of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
	/// Last decoded sample
	pub predictor: i32,
	/// Index into the step table
	pub step_index: usize,
}

impl Channel {
	/// Decodes one nibble and advances the state.
	#[inline]
	pub fn decode_nibble(&mut self, code: u8) -> i16 {
		let step = i32::from(STEP_TABLE[self.step_index]);
		let mut diff = step >> 3;

		if code & 1 != 0 {
			diff += step >> 2;
		}
		if code & 2 != 0 {
			diff += step >> 1;
		}
		if code & 4 != 0 {
			diff += step;
		}
		if code & 8 != 0 {
			diff = -diff;
		}

		self.predictor = (self.predictor + diff).clamp(i32::from(i16::MIN), i32::from(i16::MAX));
		self.step_index = (self.step_index as i32 + i32::from(INDEX_TABLE[(code & 0x0F) as usize]))
			.clamp(0, STEP_TABLE_ENTRIES as i32 - 1) as usize;
		self.predictor as i16
	}
}

/// Decodes one chunk into at most `sample_count` interleaved samples.
///
/// Every channel starts from predictor 0 and step index 0. Nibbles are read
/// low first and assigned to channels round-robin.
pub fn decode_chunk(input: &[u8], channels: usize, sample_count: usize) -> Vec<i16> {
	let mut state = [Channel::default(); 2];
	let channels = channels.clamp(1, state.len());
	let mut out = Vec::with_capacity(sample_count);

	'bytes: for &byte in input {
		for code in [byte & 0x0F, byte >> 4] {
			if out.len() >= sample_count {
				break 'bytes;
			}
			let channel = out.len() % channels;
			out.push(state[channel].decode_nibble(code));
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use rand::{Rng, SeedableRng, rngs::SmallRng};

	use super::*;

	#[test]
	fn test_zero_nibble_adds_minimum_step() {
		let mut channel = Channel::default();
		// step 7 >> 3 == 0, so the predictor stays put and the index stays clamped at 0
		assert_eq!(channel.decode_nibble(0), 0);
		assert_eq!(channel.step_index, 0);

		let mut channel = Channel {
			predictor: 100,
			step_index: 10,
		};
		// step 19 >> 3 == 2
		assert_eq!(channel.decode_nibble(0), 102);
		assert_eq!(channel.step_index, 9);
	}

	#[test]
	fn test_predictor_clamps_at_boundaries() {
		let mut channel = Channel {
			predictor: i32::from(i16::MAX) - 5,
			step_index: 88,
		};
		assert_eq!(channel.decode_nibble(0x7), i16::MAX);
		assert_eq!(channel.decode_nibble(0x7), i16::MAX);
		assert_eq!(channel.step_index, 88);

		let mut channel = Channel {
			predictor: i32::from(i16::MIN) + 5,
			step_index: 88,
		};
		assert_eq!(channel.decode_nibble(0xF), i16::MIN);
	}

	#[test]
	fn test_low_nibble_first() {
		// low nibble 4 raises the index before the high nibble is decoded
		let out = decode_chunk(&[0x04], 1, 2);
		assert_eq!(out, vec![7, 8]);
	}

	#[test]
	fn test_stereo_channels_are_independent() {
		let out = decode_chunk(&[0x07, 0x00], 2, 4);
		// left gets 7 then 0, right gets 0 then 0
		assert_eq!(out.len(), 4);
		assert_eq!(out[1], 0);
		assert_eq!(out[3], 0);
		assert_eq!(out[0], 11);
		assert_eq!(out[2], 13);
	}

	#[test]
	fn test_sample_count_limits_output() {
		assert_eq!(decode_chunk(&[0x11; 10], 1, 5).len(), 5);
		assert_eq!(decode_chunk(&[0x11; 2], 1, 50).len(), 4);
	}

	#[test]
	fn test_random_input_never_panics() {
		let mut rng = SmallRng::seed_from_u64(99);
		for _ in 0..200 {
			let mut input = vec![0u8; rng.random_range(0..512)];
			rng.fill(&mut input[..]);
			let count = rng.random_range(0..2048);
			let out = decode_chunk(&input, rng.random_range(1..=2), count);
			assert!(out.len() <= count);
		}
	}
}
