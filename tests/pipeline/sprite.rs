use std::fs;

use tiberium_rs::{
	encode::SheetMetadata,
	file::{MixBuilder, ShpBuilder},
};

use crate::{GREEN, RED, test_palette, tiberium, tiberium_with_env};

/// Two 4x4 frames: frame 0 is index 5 with a transparent top-left pixel,
/// frame 1 is solid index 7.
fn test_sprite() -> Vec<u8> {
	let mut first = vec![5u8; 16];
	first[0] = 0;
	let mut builder = ShpBuilder::new(4, 4);
	builder.add_frame(first).unwrap();
	builder.add_frame(vec![7; 16]).unwrap();
	builder.to_bytes().unwrap()
}

fn write_archive(dir: &std::path::Path) {
	let mut mix = MixBuilder::new();
	mix.add("TEST.SHP", test_sprite());
	mix.add("TEST.PAL", test_palette());
	mix.save(dir.join("TEST.MIX")).unwrap();
	fs::write(dir.join("tiberium.toml"), "extra_names = [\"TEST.SHP\", \"TEST.PAL\"]\n").unwrap();
}

#[test_log::test]
fn test_extract_then_convert_shp() {
	let dir = tempfile::tempdir().unwrap();
	write_archive(dir.path());

	let out = tiberium(dir.path(), &["extract", "TEST.MIX", "out", "--config", "tiberium.toml"]);
	assert!(out.status.success());
	assert!(String::from_utf8_lossy(&out.stdout).contains("Extracted 2 of 2 entries"));
	assert!(dir.path().join("out/TEST.SHP").is_file());
	assert!(dir.path().join("out/TEST.PAL").is_file());

	let out = tiberium(dir.path(), &["convert-shp", "out/TEST.SHP", "out/TEST.PAL", "sheet.png"]);
	assert!(out.status.success());

	let sheet = image::open(dir.path().join("sheet.png")).unwrap().to_rgba8();
	// two frames lay out as 2 columns x 1 row
	assert_eq!(sheet.dimensions(), (4 * 2, 4));
	assert_eq!(sheet.get_pixel(0, 0).0, [0, 0, 0, 0]);
	assert_eq!(sheet.get_pixel(1, 0).0, RED);
	assert_eq!(sheet.get_pixel(3, 3).0, RED);
	assert_eq!(sheet.get_pixel(4, 0).0, GREEN);

	let json = fs::read_to_string(dir.path().join("sheet.json")).unwrap();
	let metadata: SheetMetadata = serde_json::from_str(&json).unwrap();
	assert_eq!(
		metadata,
		SheetMetadata {
			frame_width: 4,
			frame_height: 4,
			frame_count: 2,
			columns: 2,
			rows: 1,
			sheet_width: 8,
			sheet_height: 4,
		}
	);
}

#[test_log::test]
fn test_convert_shp_with_columns() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("A.SHP"), test_sprite()).unwrap();
	fs::write(dir.path().join("A.PAL"), test_palette()).unwrap();

	let out = tiberium(dir.path(), &["convert-shp", "A.SHP", "A.PAL", "a.png", "--columns", "1"]);
	assert!(out.status.success());
	let sheet = image::open(dir.path().join("a.png")).unwrap().to_rgba8();
	assert_eq!(sheet.dimensions(), (4, 8));
	assert_eq!(sheet.get_pixel(0, 4).0, GREEN);
}

#[test_log::test]
fn test_missing_palette_falls_back_to_grayscale() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("A.SHP"), test_sprite()).unwrap();

	let out = tiberium(dir.path(), &["convert-shp", "A.SHP", "NOPE.PAL", "a.png"]);
	assert!(out.status.success());
	let sheet = image::open(dir.path().join("a.png")).unwrap().to_rgba8();
	assert_eq!(sheet.get_pixel(1, 0).0, [5, 5, 5, 255]);
}

#[test_log::test]
fn test_extract_and_convert_in_one_pass() {
	let dir = tempfile::tempdir().unwrap();
	write_archive(dir.path());

	let out = tiberium(
		dir.path(),
		&["extract", "TEST.MIX", "out", "--config", "tiberium.toml", "--convert", "--palette", "out/TEST.PAL"],
	);
	assert!(out.status.success());
	assert!(String::from_utf8_lossy(&out.stdout).contains("Converted 1 of 1 files"));

	let sheet = image::open(dir.path().join("out/TEST.png")).unwrap().to_rgba8();
	assert_eq!(sheet.get_pixel(1, 1).0, RED);
	assert!(dir.path().join("out/TEST.json").is_file());
}

#[test_log::test]
fn test_corrupt_sprite_fails() {
	let dir = tempfile::tempdir().unwrap();
	let mut data = test_sprite();
	// width 0
	data[6] = 0;
	data[7] = 0;
	fs::write(dir.path().join("BAD.SHP"), data).unwrap();

	let out = tiberium(dir.path(), &["convert-shp", "BAD.SHP", "NOPE.PAL", "bad.png"]);
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr).contains("width 0"));
	assert!(!dir.path().join("bad.png").exists());
}

#[test_log::test]
fn test_environment_overrides() {
	let dir = tempfile::tempdir().unwrap();
	let mut mix = MixBuilder::new();
	mix.add("TEST.SHP", test_sprite());
	mix.add("TEST.PAL", test_palette());
	mix.save(dir.path().join("TEST.MIX")).unwrap();
	let vars = [("TIBERIUM_EXTRA_NAMES", "TEST.SHP,TEST.PAL"), ("TIBERIUM_SHEET_COLUMNS", "1")];

	let out = tiberium_with_env(dir.path(), &["extract", "TEST.MIX", "out"], &vars);
	assert!(out.status.success());
	assert!(dir.path().join("out/TEST.SHP").is_file());
	assert!(dir.path().join("out/TEST.PAL").is_file());

	let out = tiberium_with_env(
		dir.path(),
		&["convert-shp", "out/TEST.SHP", "out/TEST.PAL", "sheet.png"],
		&vars,
	);
	assert!(out.status.success());
	let sheet = image::open(dir.path().join("sheet.png")).unwrap().to_rgba8();
	assert_eq!(sheet.dimensions(), (4, 8));
	assert_eq!(sheet.get_pixel(0, 4).0, GREEN);
}

#[test_log::test]
fn test_remap_applies_to_batch_conversion() {
	let dir = tempfile::tempdir().unwrap();
	write_archive(dir.path());
	fs::write(dir.path().join("A.PAL"), test_palette()).unwrap();
	fs::write(
		dir.path().join("remap.toml"),
		"extra_names = [\"TEST.SHP\", \"TEST.PAL\"]\nremap = [[5, 7]]\njobs = 1\n",
	)
	.unwrap();

	let out = tiberium(
		dir.path(),
		&["extract", "TEST.MIX", "out", "--config", "remap.toml", "--convert", "--palette", "A.PAL"],
	);
	assert!(out.status.success());

	// index 5 now borrows the color of index 7
	let sheet = image::open(dir.path().join("out/TEST.png")).unwrap().to_rgba8();
	assert_eq!(sheet.get_pixel(1, 1).0, GREEN);
	assert_eq!(sheet.get_pixel(0, 0).0, [0, 0, 0, 0]);
}
