//! Single-file conversions shared by `convert-shp`, `convert-aud` and `extract --convert`.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::warn;
use rayon::prelude::*;
use tiberium_rs::{
	encode::{SheetLayout, SheetMetadata, png, sheet},
	file::{Palette, ShpFile, aud},
};

/// Kinds of assets that can be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
	/// Sprite animation, converted to a PNG sheet
	Shp,
	/// Audio stream, converted to WAV
	Aud,
}

impl Asset {
	/// Guesses the asset kind from the file extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		let extension = path.extension()?.to_str()?;
		if extension.eq_ignore_ascii_case("shp") {
			Some(Self::Shp)
		} else if extension.eq_ignore_ascii_case("aud") {
			Some(Self::Aud)
		} else {
			None
		}
	}

	/// Extension of the converted file.
	pub fn output_extension(self) -> &'static str {
		match self {
			Self::Shp => "png",
			Self::Aud => "wav",
		}
	}
}

/// Path of the JSON sidecar for a sheet written to `output`.
pub fn sidecar_path(output: &Path) -> PathBuf {
	output.with_extension("json")
}

/// Loads `path` (grayscale if absent or unreadable) and applies `remap`.
pub fn load_palette(path: Option<&Path>, remap: &[(u8, u8)]) -> Palette {
	let palette = match path {
		// a failed load is already logged
		Some(path) => Palette::load_or_grayscale(path).into_value(),
		None => {
			warn!("no palette given, using grayscale");
			Palette::grayscale()
		}
	};

	if remap.is_empty() {
		palette
	} else {
		palette.remap(remap)
	}
}

/// Converts an SHP file into a PNG sheet plus JSON sidecar.
pub fn convert_shp(
	input: &Path,
	palette: &Palette,
	columns: Option<u32>,
	output: &Path,
) -> Result<SheetMetadata> {
	let shp =
		ShpFile::open(input).with_context(|| format!("cannot parse {}", input.display()))?;
	let frames = shp.frames();
	if let Some(fallback) = frames.fallback() {
		warn!("{}: {fallback}", input.display());
	}
	let frames = frames.into_value();

	let layout = SheetLayout::for_frames(
		u32::from(shp.width()),
		u32::from(shp.height()),
		frames.len() as u32,
		columns,
	);
	let rgba = sheet::compose(&layout, &frames, palette)?;
	png::save(output, layout.sheet_width(), layout.sheet_height(), &rgba)
		.with_context(|| format!("cannot write {}", output.display()))?;

	let metadata = layout.metadata();
	let sidecar = sidecar_path(output);
	fs::write(&sidecar, serde_json::to_string_pretty(&metadata)?)
		.with_context(|| format!("cannot write {}", sidecar.display()))?;
	Ok(metadata)
}

/// Converts an AUD file into WAV. Returns the duration in milliseconds.
pub fn convert_aud(input: &Path, output: &Path) -> Result<u64> {
	let audio = aud::open(input).with_context(|| format!("cannot decode {}", input.display()))?;
	audio.save_wav(output).with_context(|| format!("cannot write {}", output.display()))?;
	Ok(audio.duration_ms())
}

/// Converts one file, picking the converter from its extension.
pub fn convert_file(
	input: &Path,
	palette: &Palette,
	columns: Option<u32>,
) -> Result<(Asset, PathBuf)> {
	let asset = Asset::from_path(input)
		.with_context(|| format!("{} is neither SHP nor AUD", input.display()))?;
	let output = input.with_extension(asset.output_extension());
	match asset {
		Asset::Shp => {
			convert_shp(input, palette, columns, &output)?;
		}
		Asset::Aud => {
			convert_aud(input, &output)?;
		}
	}
	Ok((asset, output))
}

/// Converts `inputs` in parallel on a pool of `jobs` threads (0 = one per core).
///
/// Every failure is returned alongside its input; the others still run.
pub fn convert_batch(
	inputs: &[PathBuf],
	palette: &Palette,
	columns: Option<u32>,
	jobs: usize,
) -> Result<Vec<(PathBuf, Result<(Asset, PathBuf)>)>> {
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(jobs)
		.build()
		.context("cannot start conversion workers")?;

	Ok(pool.install(|| {
		inputs
			.par_iter()
			.map(|input| (input.clone(), convert_file(input, palette, columns)))
			.collect()
	}))
}
