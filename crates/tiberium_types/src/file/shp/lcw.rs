//! LCW ("Format80") dictionary compression.
//!
//! ## Commands
//!
//! | Command byte   | Operands              | Effect                                                 |
//! |----------------|-----------------------|--------------------------------------------------------|
//! | `0b0ccc_pppp`  | `p2`                  | copy `ccc + 3` bytes from `pos - (pppp << 8 \| p2)`      |
//! | `0x80`         |                       | end of stream                                          |
//! | `0b10cc_cccc`  | `cccccc` bytes        | literal run of `cccccc` bytes                          |
//! | `0b11cc_cccc`  | `u16` pos             | copy `cccccc + 3` bytes from absolute `pos`            |
//! | `0xFE`         | `u16` count, `u8` val | fill `count` bytes with `val`                          |
//! | `0xFF`         | `u16` count, `u16` pos| copy `count` bytes from absolute `pos`                 |
//!
//! Copies may overlap the write cursor and are performed byte by byte so that
//! short distances replicate patterns. Every command is clamped to the output
//! size; decoding stops at the end marker, when the output is full, or when
//! the input runs out.

use log::debug;

/// Input cursor that reports exhaustion instead of panicking.
struct Source<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Source<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
		}
	}

	#[inline]
	fn u8(&mut self) -> Option<u8> {
		let byte = *self.data.get(self.pos)?;
		self.pos += 1;
		Some(byte)
	}

	#[inline]
	fn u16(&mut self) -> Option<u16> {
		let lo = self.u8()?;
		let hi = self.u8()?;
		Some(u16::from_le_bytes([lo, hi]))
	}

	fn bytes(&mut self, count: usize) -> &'a [u8] {
		let end = (self.pos + count).min(self.data.len());
		let slice = &self.data[self.pos..end];
		self.pos = end;
		slice
	}
}

/// Byte-by-byte copy inside `out`; returns the new write position.
///
/// Stops early if the source leaves the initialized region.
#[inline]
fn copy_within(out: &mut [u8], mut src: usize, mut dst: usize, count: usize) -> usize {
	let end = (dst + count).min(out.len());
	while dst < end {
		if src >= out.len() {
			break;
		}
		out[dst] = out[src];
		src += 1;
		dst += 1;
	}
	dst
}

/// Decompresses `input` into a fresh buffer of exactly `output_size` bytes.
///
/// Bytes not produced by the stream stay zero.
pub fn decompress(input: &[u8], output_size: usize) -> Vec<u8> {
	let mut out = vec![0u8; output_size];
	decompress_into(input, &mut out);
	out
}

/// Decompresses `input` into `out`, returning the number of bytes written.
pub fn decompress_into(input: &[u8], out: &mut [u8]) -> usize {
	let mut src = Source::new(input);
	let size = out.len();
	let mut pos = 0usize;

	while pos < size {
		let Some(cmd) = src.u8() else {
			break;
		};

		match cmd {
			0x80 => break,
			0x00..=0x7F => {
				let Some(low) = src.u8() else {
					break;
				};
				let count = ((cmd >> 4) & 0x07) as usize + 3;
				let distance = (((cmd & 0x0F) as usize) << 8) | low as usize;
				if distance > pos {
					debug!("LCW: back-copy distance {distance} before start at {pos}");
					break;
				}
				pos = copy_within(out, pos - distance, pos, count);
			}
			0x81..=0xBF => {
				let count = ((cmd & 0x3F) as usize).min(size - pos);
				let literal = src.bytes(count);
				out[pos..pos + literal.len()].copy_from_slice(literal);
				pos += literal.len();
				if literal.len() < count {
					break;
				}
			}
			0xFE => {
				let (Some(count), Some(value)) = (src.u16(), src.u8()) else {
					break;
				};
				let end = (pos + count as usize).min(size);
				out[pos..end].fill(value);
				pos = end;
			}
			0xFF => {
				let (Some(count), Some(from)) = (src.u16(), src.u16()) else {
					break;
				};
				pos = copy_within(out, from as usize, pos, count as usize);
			}
			0xC0..=0xFD => {
				let Some(from) = src.u16() else {
					break;
				};
				let count = (cmd & 0x3F) as usize + 3;
				pos = copy_within(out, from as usize, pos, count);
			}
		}
	}

	pos
}

/// Compresses `data` using long fills for runs and literal runs otherwise.
///
/// The output always ends with the `0x80` end marker.
pub fn compress(data: &[u8]) -> Vec<u8> {
	const MIN_RUN: usize = 3;
	const MAX_LITERAL: usize = 63;

	fn flush(out: &mut Vec<u8>, literal: &[u8]) {
		for chunk in literal.chunks(MAX_LITERAL) {
			out.push(0x80 | chunk.len() as u8);
			out.extend_from_slice(chunk);
		}
	}

	let mut out = Vec::with_capacity(data.len() + data.len() / MAX_LITERAL + 2);
	let mut literal_start = 0;
	let mut i = 0;

	while i < data.len() {
		let value = data[i];
		let run = data[i..].iter().take(u16::MAX as usize).take_while(|&&b| b == value).count();
		if run >= MIN_RUN {
			flush(&mut out, &data[literal_start..i]);
			out.push(0xFE);
			out.extend_from_slice(&(run as u16).to_le_bytes());
			out.push(value);
			i += run;
			literal_start = i;
		} else {
			i += run;
		}
	}
	flush(&mut out, &data[literal_start..]);
	out.push(0x80);
	out
}
