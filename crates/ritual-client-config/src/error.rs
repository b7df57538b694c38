// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// The backend origin must be an absolute http(s) URL.
	#[error("'{0}' is not an http(s) URL")]
	InvalidBaseUrl(String),

	#[error("default locale '{0}' is not one of the configured locales")]
	UnknownDefaultLocale(String),

	#[error("invalid value for {field}: {message}")]
	InvalidValue { field: &'static str, message: String },

	#[error("could not determine home directory")]
	NoHomeDir,
}

impl ConfigError {
	pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field,
			message: message.into(),
		}
	}
}
