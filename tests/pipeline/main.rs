//! End-to-end tests for `tiberium-rs`
//!
//! Synthetic archives, sprites and sounds are built in memory, written to a
//! temporary directory and pushed through the `tiberium` binary.

mod archive;
mod audio;
mod sprite;

use std::{
	path::Path,
	process::{Command, Output},
};

use tiberium_rs::file::Palette;

/// Palette index 5 in [`test_palette`]
pub(crate) const RED: [u8; 4] = [255, 0, 130, 255];

/// Palette index 7 in [`test_palette`]
pub(crate) const GREEN: [u8; 4] = [0, 255, 0, 255];

/// 768-byte palette with index 5 set to `RED` and 7 to `GREEN`, gray elsewhere.
pub(crate) fn test_palette() -> Vec<u8> {
	let mut data = vec![10u8; Palette::FILE_SIZE];
	data[15..18].copy_from_slice(&[63, 0, 32]);
	data[21..24].copy_from_slice(&[0, 63, 0]);
	data
}

/// Runs the `tiberium` binary in `dir` with `args`.
pub(crate) fn tiberium(dir: &Path, args: &[&str]) -> Output {
	tiberium_with_env(dir, args, &[])
}

/// Runs the `tiberium` binary in `dir` with `args` and extra environment variables.
pub(crate) fn tiberium_with_env(dir: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
	let output = Command::new(env!("CARGO_BIN_EXE_tiberium"))
		.current_dir(dir)
		.args(args)
		.env_remove("TIBERIUM_CONFIG")
		.env("RUST_LOG", "info")
		.envs(vars.iter().copied())
		.output()
		.expect("failed to run tiberium");
	log::info!(
		"tiberium {}\n{}{}",
		args.join(" "),
		String::from_utf8_lossy(&output.stdout),
		String::from_utf8_lossy(&output.stderr)
	);
	output
}
