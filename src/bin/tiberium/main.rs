//! Tiberium asset converter
//!
//! Command-line front end for extracting MIX archives and converting their
//! SHP sprites and AUD sounds into PNG sprite sheets and WAV files.
//!
//! # Usage
//!
//! ```bash
//! # Show the index of an archive
//! tiberium list CONQUER.MIX
//!
//! # Extract every entry, then convert sprites and sounds
//! tiberium extract CONQUER.MIX out/ --convert --palette TEMPERAT.PAL
//!
//! # Convert a single sprite to a sheet (writes E1.png and E1.json)
//! tiberium convert-shp E1.SHP TEMPERAT.PAL E1.png --columns 8
//!
//! # Convert a single sound
//! tiberium convert-aud BOMBIT1.AUD BOMBIT1.wav
//! ```
//!
//! Settings can also come from a TOML file (`--config`, or `TIBERIUM_CONFIG`)
//! and `TIBERIUM_*` environment variables, e.g. `TIBERIUM_SHEET_COLUMNS=8`.

mod convert;
mod extract;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "tiberium")]
#[command(author = "tiberium-rs project")]
#[command(version)]
#[command(about = "Converts MIX/SHP/AUD game assets into PNG, WAV and JSON", long_about = None)]
struct Cli {
	/// Settings file (TOML)
	#[arg(long, global = true, env = "TIBERIUM_CONFIG", value_name = "FILE")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Extract every entry of a MIX archive
	Extract {
		/// Input MIX archive
		#[arg(value_name = "ARCHIVE")]
		archive: PathBuf,

		/// Directory receiving the extracted files
		#[arg(value_name = "OUTPUT_DIR")]
		output_dir: PathBuf,

		/// Convert extracted SHP and AUD files afterwards
		#[arg(short, long)]
		convert: bool,

		/// Palette used when converting sprites
		#[arg(short, long, value_name = "PALETTE", requires = "convert")]
		palette: Option<PathBuf>,
	},

	/// Convert an SHP sprite into a PNG sheet with a JSON sidecar
	ConvertShp {
		/// Input SHP file
		#[arg(value_name = "IMAGE")]
		image: PathBuf,

		/// 768-byte VGA palette (grayscale is used if it cannot be read)
		#[arg(value_name = "PALETTE")]
		palette: PathBuf,

		/// Output PNG file
		#[arg(value_name = "OUTPUT_PNG")]
		output: PathBuf,

		/// Frames per sheet row (defaults to a square-ish grid)
		#[arg(long, value_name = "N")]
		columns: Option<u32>,
	},

	/// Convert an AUD sound into WAV
	ConvertAud {
		/// Input AUD file
		#[arg(value_name = "AUDIO")]
		audio: PathBuf,

		/// Output WAV file
		#[arg(value_name = "OUTPUT_WAV")]
		output: PathBuf,
	},

	/// List the entries of a MIX archive
	List {
		/// Input MIX archive
		#[arg(value_name = "ARCHIVE")]
		archive: PathBuf,
	},
}

fn run(cli: Cli) -> Result<()> {
	let settings = Settings::load(cli.config.as_deref()).context("invalid settings")?;

	match cli.command {
		Commands::Extract {
			archive,
			output_dir,
			convert,
			palette,
		} => extract::extract(&archive, &output_dir, convert, palette.as_deref(), &settings),

		Commands::ConvertShp {
			image,
			palette,
			output,
			columns,
		} => {
			let palette = convert::load_palette(Some(&palette), &settings.remap);
			let metadata = convert::convert_shp(
				&image,
				&palette,
				columns.or(settings.sheet_columns),
				&output,
			)?;
			println!(
				"{} -> {} ({} frames of {}x{}, {}x{} grid)",
				image.display(),
				output.display(),
				metadata.frame_count,
				metadata.frame_width,
				metadata.frame_height,
				metadata.columns,
				metadata.rows
			);
			Ok(())
		}

		Commands::ConvertAud {
			audio,
			output,
		} => {
			let duration = convert::convert_aud(&audio, &output)?;
			println!("{} -> {} ({duration} ms)", audio.display(), output.display());
			Ok(())
		}

		Commands::List {
			archive,
		} => extract::list(&archive, &settings),
	}
}

fn main() -> ExitCode {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	match run(Cli::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}
