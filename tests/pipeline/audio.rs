use std::fs;

use tiberium_rs::file::{AudSamples, aud};

use crate::tiberium;

/// Mono 22050 Hz WS ADPCM stream with one chunk of repeat commands.
fn repeat_aud(repeats: usize) -> (Vec<u8>, u32) {
	let payload = vec![0xFFu8; repeats];
	let output_size = (repeats * 64) as u32;

	let mut data = Vec::new();
	data.extend_from_slice(&22050u16.to_le_bytes());
	data.extend_from_slice(&(payload.len() as u32 + 8).to_le_bytes());
	data.extend_from_slice(&output_size.to_le_bytes());
	data.extend_from_slice(&[0, aud::constants::CODEC_WS_ADPCM]);
	data.extend_from_slice(&(payload.len() as u16).to_le_bytes());
	data.extend_from_slice(&(output_size as u16).to_le_bytes());
	data.extend_from_slice(&aud::constants::CHUNK_SIGNATURE.to_le_bytes());
	data.extend_from_slice(&payload);
	(data, output_size)
}

#[test_log::test]
fn test_repeat_chunk_decodes_to_midpoint() {
	let (data, output_size) = repeat_aud(16);
	let audio = aud::decode(&data).unwrap();
	assert_eq!(audio.header.sample_rate, 22050);
	assert_eq!(audio.channels(), 1);
	assert_eq!(audio.samples, AudSamples::U8(vec![128; output_size as usize]));
}

#[test_log::test]
fn test_convert_aud() {
	let dir = tempfile::tempdir().unwrap();
	let (data, output_size) = repeat_aud(16);
	fs::write(dir.path().join("TEST.AUD"), data).unwrap();

	let out = tiberium(dir.path(), &["convert-aud", "TEST.AUD", "test.wav"]);
	assert!(out.status.success());

	let mut reader = hound::WavReader::open(dir.path().join("test.wav")).unwrap();
	let spec = reader.spec();
	assert_eq!(spec.sample_rate, 22050);
	assert_eq!(spec.channels, 1);
	assert_eq!(spec.bits_per_sample, 8);
	// duration in seconds is output_size / sample_rate
	assert_eq!(reader.duration(), output_size);
	let seconds = f64::from(reader.duration()) / f64::from(spec.sample_rate);
	assert!((seconds - f64::from(output_size) / 22050.0).abs() < f64::EPSILON);

	// 8-bit WAV samples are unsigned; hound reports them centred on zero
	assert!(reader.samples::<i8>().all(|s| s.unwrap() == 0));
}

#[test_log::test]
fn test_convert_aud_rejects_bad_rate() {
	let dir = tempfile::tempdir().unwrap();
	let (mut data, _) = repeat_aud(1);
	data[..2].copy_from_slice(&1000u16.to_le_bytes());
	fs::write(dir.path().join("SLOW.AUD"), data).unwrap();

	let out = tiberium(dir.path(), &["convert-aud", "SLOW.AUD", "slow.wav"]);
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr).contains("sample rate 1000 Hz"));
}
