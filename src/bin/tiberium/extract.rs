//! `list` and `extract` subcommands.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use log::{error, info};
use tiberium_rs::file::{MixFile, NameIndex};

use crate::{
	convert::{self, Asset},
	settings::Settings,
};

/// Builds the name index: the built-in names plus any from the settings.
pub fn name_index(settings: &Settings) -> NameIndex {
	if settings.extra_names.is_empty() {
		NameIndex::global().clone()
	} else {
		NameIndex::with_extra(settings.extra_names.iter())
	}
}

/// Prints the archive index.
pub fn list(archive: &Path, settings: &Settings) -> Result<()> {
	let mix =
		MixFile::open(archive).with_context(|| format!("cannot open {}", archive.display()))?;
	let names = name_index(settings);

	println!("{}: {} entries, {} bytes body", archive.display(), mix.len(), mix.body_size());
	println!("{:>5}  {:>8}  {:<16} {:>10} {:>10}", "#", "key", "name", "offset", "size");
	for (ordinal, entry) in mix.list().iter().enumerate() {
		println!(
			"{ordinal:>5}  {:08X}  {:<16} {:>10} {:>10}",
			entry.key,
			names.name_for(entry.key),
			entry.offset,
			entry.size
		);
	}
	Ok(())
}

/// Extracts every entry of `archive` into `output_dir`, optionally converting
/// the SHP and AUD files afterwards.
pub fn extract(
	archive: &Path,
	output_dir: &Path,
	convert: bool,
	palette: Option<&Path>,
	settings: &Settings,
) -> Result<()> {
	let mut mix =
		MixFile::open(archive).with_context(|| format!("cannot open {}", archive.display()))?;
	fs::create_dir_all(output_dir)
		.with_context(|| format!("cannot create {}", output_dir.display()))?;
	let names = name_index(settings);

	println!("Extracting {} entries from {}", mix.len(), archive.display());
	let total = mix.len();
	let mut failed = 0usize;
	let mut extracted: Vec<PathBuf> = Vec::with_capacity(total);

	for (entry, data) in mix.iter() {
		let name = names.name_for(entry.key);
		let data = match data {
			Ok(data) => data,
			Err(e) if e.is_entry_local() => {
				error!("{name}: {e}");
				failed += 1;
				continue;
			}
			Err(e) => {
				return Err(e).with_context(|| format!("cannot read {}", archive.display()));
			}
		};

		let path = output_dir.join(&name);
		match fs::write(&path, &data) {
			Ok(()) => {
				println!("  {name} ({} bytes)", data.len());
				extracted.push(path);
			}
			Err(e) => {
				error!("cannot write {}: {e}", path.display());
				failed += 1;
			}
		}
	}
	println!("Extracted {} of {total} entries to {}", extracted.len(), output_dir.display());

	if convert {
		failed += convert_extracted(&extracted, palette, settings)?;
	}

	if failed > 0 {
		bail!("{failed} file(s) failed");
	}
	Ok(())
}

/// Converts the extracted SHP and AUD files in parallel. Returns the failure count.
fn convert_extracted(
	extracted: &[PathBuf],
	palette: Option<&Path>,
	settings: &Settings,
) -> Result<usize> {
	let inputs: Vec<PathBuf> =
		extracted.iter().filter(|p| Asset::from_path(p).is_some()).cloned().collect();
	if inputs.is_empty() {
		info!("nothing to convert");
		return Ok(0);
	}

	let palette = convert::load_palette(palette, &settings.remap);
	println!("Converting {} files", inputs.len());
	let results =
		convert::convert_batch(&inputs, &palette, settings.sheet_columns, settings.jobs.unwrap_or(0))?;

	let mut failed = 0;
	for (input, result) in results {
		match result {
			Ok((_, output)) => println!("  {} -> {}", input.display(), output.display()),
			Err(e) => {
				error!("{}: {e:#}", input.display());
				failed += 1;
			}
		}
	}
	println!("Converted {} of {} files", inputs.len() - failed, inputs.len());
	Ok(failed)
}
