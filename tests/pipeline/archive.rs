use std::fs;

use tiberium_rs::file::{MixBuilder, MixFile, name_hash};

use crate::tiberium;

#[test_log::test]
fn test_list() {
	let dir = tempfile::tempdir().unwrap();
	let mut mix = MixBuilder::new();
	mix.add("RULES.INI", b"[General]\n".to_vec());
	mix.add_key(0x1234_5678, vec![0; 32]);
	mix.save(dir.path().join("LOCAL.MIX")).unwrap();

	let out = tiberium(dir.path(), &["list", "LOCAL.MIX"]);
	assert!(out.status.success());
	let stdout = String::from_utf8_lossy(&out.stdout);
	assert!(stdout.contains("2 entries"));
	assert!(stdout.contains("12345678.bin"));
	assert!(stdout.contains(&format!("{:08X}", name_hash("rules.ini"))));
}

#[test_log::test]
fn test_extract_unknown_names_get_placeholders() {
	let dir = tempfile::tempdir().unwrap();
	let mut mix = MixBuilder::new();
	mix.add_key(0xCAFE_F00D, vec![1, 2, 3]);
	mix.save(dir.path().join("X.MIX")).unwrap();

	let out = tiberium(dir.path(), &["extract", "X.MIX", "out"]);
	assert!(out.status.success());
	assert_eq!(fs::read(dir.path().join("out/CAFEF00D.bin")).unwrap(), vec![1, 2, 3]);
}

#[test_log::test]
fn test_truncated_entry_does_not_stop_extraction() {
	let dir = tempfile::tempdir().unwrap();
	let mut mix = MixBuilder::new();
	mix.add_key(1, vec![0xAA; 8]);
	mix.add_key(2, vec![0xBB; 64]);
	let mut data = mix.to_bytes().unwrap();
	// cut into the body of the last entry
	data.truncate(data.len() - 10);
	fs::write(dir.path().join("CUT.MIX"), &data).unwrap();

	let archive = MixFile::open(dir.path().join("CUT.MIX")).unwrap();
	assert_eq!(archive.len(), 2);

	let out = tiberium(dir.path(), &["extract", "CUT.MIX", "out"]);
	assert!(!out.status.success());
	assert_eq!(fs::read(dir.path().join("out/00000001.bin")).unwrap(), vec![0xAA; 8]);
	assert!(!dir.path().join("out/00000002.bin").exists());
	let stderr = String::from_utf8_lossy(&out.stderr);
	assert!(stderr.contains("truncated entry 00000002"), "{stderr}");
}

#[test_log::test]
fn test_missing_archive_fails() {
	let dir = tempfile::tempdir().unwrap();
	let out = tiberium(dir.path(), &["extract", "NOPE.MIX", "out"]);
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr).contains("NOPE.MIX"));
}
