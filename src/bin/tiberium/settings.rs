//! Layered settings: optional TOML file, then `TIBERIUM_*` environment variables.

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Prefix of the environment variables read as settings
pub const ENV_PREFIX: &str = "TIBERIUM";

/// Runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Fixed column count for sprite sheets
	pub sheet_columns: Option<u32>,
	/// File names added to the reverse hash index
	pub extra_names: Vec<String>,
	/// `(index, source)` pairs applied to the palette before encoding
	pub remap: Vec<(u8, u8)>,
	/// Worker threads for batch conversion
	pub jobs: Option<usize>,
}

impl Settings {
	/// Loads settings from `path` (if it exists) and the environment.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut builder = Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
		}
		builder
			.add_source(
				Environment::with_prefix(ENV_PREFIX)
					.try_parsing(true)
					.list_separator(",")
					.with_list_parse_key("extra_names"),
			)
			.build()?
			.try_deserialize()
	}

	/// Loads settings from a TOML string only.
	#[cfg(test)]
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Config::builder()
			.add_source(File::from_str(source, FileFormat::Toml))
			.build()?
			.try_deserialize()
	}
}
