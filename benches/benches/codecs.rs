//! Benchmark suite for the sprite and audio decoders
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tiberium_benches::{generate_aud, generate_frame, generate_shp};
use tiberium_types::{
	encode::png,
	file::{Palette, ShpFile, aud, shp::lcw},
};

/// Benchmark LCW decompression of single frames
fn bench_lcw(c: &mut Criterion) {
	let mut group = c.benchmark_group("lcw");

	for (width, height) in [(24u16, 24u16), (64, 48), (320, 200)] {
		let frame = generate_frame(width, height, 3);
		let packed = lcw::compress(&frame);
		group.throughput(Throughput::Bytes(frame.len() as u64));
		group.bench_with_input(
			BenchmarkId::new("decompress", format!("{width}x{height}")),
			&packed,
			|b, packed| b.iter(|| black_box(lcw::decompress(black_box(packed), frame.len()))),
		);
		group.bench_with_input(
			BenchmarkId::new("compress", format!("{width}x{height}")),
			&frame,
			|b, frame| b.iter(|| black_box(lcw::compress(black_box(frame)))),
		);
	}

	group.finish();
}

/// Benchmark decoding every frame of a sprite
fn bench_shp_frames(c: &mut Criterion) {
	let mut group = c.benchmark_group("shp");
	let data = generate_shp(48, 48, 32);
	let shp = ShpFile::from_bytes(data).unwrap();

	group.throughput(Throughput::Elements(shp.frame_count() as u64));
	group.bench_function("frames", |b| b.iter(|| black_box(shp.frames())));
	group.finish();
}

/// Benchmark WS ADPCM decoding
fn bench_aud(c: &mut Criterion) {
	let mut group = c.benchmark_group("aud");
	let data = generate_aud(64);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("decode_ws", |b| b.iter(|| black_box(aud::decode(black_box(&data)))));
	group.finish();
}

/// Benchmark sheet encoding
fn bench_png(c: &mut Criterion) {
	let mut group = c.benchmark_group("png");
	let frame = generate_frame(256, 256, 1);
	let rgba = Palette::grayscale().apply(&frame);

	group.throughput(Throughput::Bytes(rgba.len() as u64));
	group.bench_function("encode_256", |b| {
		b.iter(|| black_box(png::encode(256, 256, black_box(&rgba))))
	});
	group.finish();
}

criterion_group!(benches, bench_lcw, bench_shp_frames, bench_aud, bench_png);
criterion_main!(benches);
