//! Benchmark helper utilities for tiberium-rs
//!
//! Generates synthetic sprites and audio streams shaped like real game
//! assets: mostly-transparent unit frames and speech-like ADPCM chunks.

use tiberium_types::file::{
	ShpBuilder,
	aud::constants::{CHUNK_SIGNATURE, CODEC_WS_ADPCM},
};

/// Generates one frame of palette indices: a transparent border around a
/// shaded blob, the typical shape of a unit sprite.
pub fn generate_frame(width: u16, height: u16, seed: u8) -> Vec<u8> {
	let (w, h) = (width as i32, height as i32);
	let mut pixels = vec![0u8; width as usize * height as usize];
	for y in 0..h {
		for x in 0..w {
			let (dx, dy) = (x - w / 2, y - h / 2);
			if dx * dx + dy * dy < (w * h) / 8 {
				pixels[(y * w + x) as usize] = 16 + ((x + y + i32::from(seed)) % 32) as u8;
			}
		}
	}
	pixels
}

/// Generates an LCW-only SHP with `frames` frames.
pub fn generate_shp(width: u16, height: u16, frames: u8) -> Vec<u8> {
	let mut builder = ShpBuilder::new(width, height);
	for seed in 0..frames {
		builder.add_frame(generate_frame(width, height, seed)).unwrap();
	}
	builder.to_bytes().unwrap()
}

/// Generates a mono WS ADPCM stream of `chunks` chunks, each decoding to
/// 2048 samples through a mix of 4-bit deltas and repeats.
pub fn generate_aud(chunks: usize) -> Vec<u8> {
	const CHUNK_OUTPUT: u16 = 2048;

	let mut payload = Vec::new();
	// 60 bytes of 4-bit deltas -> 120 samples, then 8 repeats, until 2048
	let mut produced = 0usize;
	while produced < CHUNK_OUTPUT as usize {
		payload.push(0x40 | 59);
		payload.extend((0..60u8).map(|i| i.wrapping_mul(37)));
		payload.push(0xC7);
		produced += 128;
	}

	let mut body = Vec::new();
	for _ in 0..chunks {
		body.extend_from_slice(&(payload.len() as u16).to_le_bytes());
		body.extend_from_slice(&CHUNK_OUTPUT.to_le_bytes());
		body.extend_from_slice(&CHUNK_SIGNATURE.to_le_bytes());
		body.extend_from_slice(&payload);
	}

	let mut data = Vec::new();
	data.extend_from_slice(&22050u16.to_le_bytes());
	data.extend_from_slice(&(body.len() as u32).to_le_bytes());
	data.extend_from_slice(&(chunks as u32 * u32::from(CHUNK_OUTPUT)).to_le_bytes());
	data.extend_from_slice(&[0, CODEC_WS_ADPCM]);
	data.extend_from_slice(&body);
	data
}
