// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: TOML file, environment, command line.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::layer::{CacheLayer, ConfigLayer, I18nLayer, LoggingLayer, ServerLayer, StorageLayer};
use crate::ConfigError;

/// Load a TOML config file. A missing file yields an empty layer.
pub fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
	if !path.exists() {
		debug!(path = %path.display(), "config file not found, skipping");
		return Ok(ConfigLayer::default());
	}

	let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	let layer = toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
		path: path.to_path_buf(),
		source,
	})?;
	debug!(path = %path.display(), "loaded config file");
	Ok(layer)
}

/// Build a layer from `RITUAL_*` environment variables.
///
/// Takes the variables as an iterator so tests do not have to mutate the
/// process environment.
pub fn load_env<I>(vars: I) -> ConfigLayer
where
	I: IntoIterator<Item = (String, String)>,
{
	let mut layer = ConfigLayer::default();

	for (key, value) in vars {
		if !key.starts_with("RITUAL_") {
			continue;
		}

		let value = value.trim().to_string();
		if value.is_empty() {
			continue;
		}

		match key.as_str() {
			"RITUAL_BASE_URL" => {
				trace!("base_url from environment");
				layer.server.get_or_insert_with(ServerLayer::default).base_url = Some(value);
			}
			"RITUAL_REQUEST_TIMEOUT_SECS" => {
				if let Ok(secs) = value.parse() {
					layer
						.server
						.get_or_insert_with(ServerLayer::default)
						.request_timeout_secs = Some(secs);
				}
			}
			"RITUAL_DEFAULT_LOCALE" => {
				layer.i18n.get_or_insert_with(I18nLayer::default).default_locale = Some(value);
			}
			"RITUAL_DEDUPE_INTERVAL_SECS" => {
				if let Ok(secs) = value.parse() {
					layer
						.cache
						.get_or_insert_with(CacheLayer::default)
						.dedupe_interval_secs = Some(secs);
				}
			}
			"RITUAL_STORAGE_PATH" => {
				layer.storage.get_or_insert_with(StorageLayer::default).path =
					Some(PathBuf::from(value));
			}
			"RITUAL_LOG_LEVEL" => {
				layer.logging.get_or_insert_with(LoggingLayer::default).level = Some(value);
			}
			"RITUAL_LOG_FORMAT" => {
				layer.logging.get_or_insert_with(LoggingLayer::default).format = Some(value);
			}
			_ => trace!(key = %key, "ignoring unknown RITUAL_ variable"),
		}
	}

	layer
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub base_url: Option<String>,
	pub storage_path: Option<PathBuf>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
}

impl CliOverrides {
	pub fn into_layer(self) -> ConfigLayer {
		let mut layer = ConfigLayer::default();
		if let Some(base_url) = self.base_url {
			layer.server.get_or_insert_with(ServerLayer::default).base_url = Some(base_url);
		}
		if let Some(path) = self.storage_path {
			layer.storage.get_or_insert_with(StorageLayer::default).path = Some(path);
		}
		if let Some(level) = self.log_level {
			layer.logging.get_or_insert_with(LoggingLayer::default).level = Some(level);
		}
		if let Some(format) = self.log_format {
			layer.logging.get_or_insert_with(LoggingLayer::default).format = Some(format);
		}
		layer
	}
}
