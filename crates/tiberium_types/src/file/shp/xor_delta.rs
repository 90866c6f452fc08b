//! XOR-delta ("Format40") frame edits.
//!
//! A delta stream describes a frame as XOR edits applied in place on top of a
//! reference frame. The caller copies the reference into the output buffer
//! first; [`apply`] then walks the stream:
//!
//! | Command          | Operands             | Effect                                    |
//! |------------------|----------------------|-------------------------------------------|
//! | `0x00 0x00`      |                      | end of stream                             |
//! | `0x00 n`         | `u8` value           | XOR `n` positions with `value`            |
//! | `0x01..=0x7F`    | `cmd` bytes          | XOR the next `cmd` input bytes in         |
//! | `0x80 w:u16`     |                      | `w == 0`: end of stream                   |
//! |                  |                      | bit 15 clear: skip `w & 0x7FFF` positions |
//! |                  | `w & 0x3FFF` bytes   | `0b10`: XOR that many input bytes in      |
//! |                  | `u8` value           | `0b11`: XOR `w & 0x3FFF` positions        |
//! | `0x81..=0xFF`    |                      | skip `cmd & 0x7F` positions               |
//!
//! Any command that would reach past the frame stops decoding.

/// Applies the delta stream `input` to `frame` in place.
///
/// Returns the final cursor position within the frame.
pub fn apply(input: &[u8], frame: &mut [u8]) -> usize {
	let size = frame.len();
	let mut src = 0usize;
	let mut pos = 0usize;

	let next = |src: &mut usize| -> Option<u8> {
		let byte = *input.get(*src)?;
		*src += 1;
		Some(byte)
	};

	loop {
		let Some(cmd) = next(&mut src) else {
			break;
		};

		match cmd {
			0x00 => {
				let Some(count) = next(&mut src) else {
					break;
				};
				if count == 0 {
					break;
				}
				let Some(value) = next(&mut src) else {
					break;
				};
				let Some(end) = bounded(pos, count as usize, size) else {
					break;
				};
				frame[pos..end].iter_mut().for_each(|p| *p ^= value);
				pos = end;
			}
			0x01..=0x7F => {
				let Some(end) = bounded(pos, cmd as usize, size) else {
					break;
				};
				let Some(bytes) = input.get(src..src + cmd as usize) else {
					break;
				};
				src += cmd as usize;
				frame[pos..end].iter_mut().zip(bytes).for_each(|(p, b)| *p ^= b);
				pos = end;
			}
			0x80 => {
				let (Some(lo), Some(hi)) = (next(&mut src), next(&mut src)) else {
					break;
				};
				let word = u16::from_le_bytes([lo, hi]);
				if word == 0 {
					break;
				}

				if word & 0x8000 == 0 {
					let Some(end) = bounded(pos, (word & 0x7FFF) as usize, size) else {
						break;
					};
					pos = end;
					continue;
				}

				let count = (word & 0x3FFF) as usize;
				let Some(end) = bounded(pos, count, size) else {
					break;
				};
				if word & 0x4000 == 0 {
					let Some(bytes) = input.get(src..src + count) else {
						break;
					};
					src += count;
					frame[pos..end].iter_mut().zip(bytes).for_each(|(p, b)| *p ^= b);
				} else {
					let Some(value) = next(&mut src) else {
						break;
					};
					frame[pos..end].iter_mut().for_each(|p| *p ^= value);
				}
				pos = end;
			}
			0x81..=0xFF => {
				let Some(end) = bounded(pos, (cmd & 0x7F) as usize, size) else {
					break;
				};
				pos = end;
			}
		}
	}

	pos
}

/// End of a `count`-long span at `pos`, or `None` if it leaves the frame.
#[inline]
fn bounded(pos: usize, count: usize, size: usize) -> Option<usize> {
	let end = pos.checked_add(count)?;
	(end <= size).then_some(end)
}
