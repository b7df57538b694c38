// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ritual_common_i18n::{LocaleInfo, LocaleRegistry, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_THEME: &str = "xiaohongshu";
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The final, validated configuration shared by the CLI, the user client
/// and the admin client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Backend origin; endpoint paths such as `/api/auth/me` are joined onto it.
	pub base_url: String,
	#[serde(with = "secs")]
	pub request_timeout: Duration,
	pub default_locale: String,
	pub locales: Vec<LocaleInfo>,
	pub default_theme: String,
	pub themes: Vec<String>,
	/// Window during which identical queries share one request.
	#[serde(with = "secs")]
	pub dedupe_interval: Duration,
	pub storage_path: PathBuf,
	pub logging: LoggingConfig,

	/// Resolved XDG paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,
}

mod secs {
	use serde::{self, Deserialize, Deserializer, Serializer};
	use std::time::Duration;

	pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(duration.as_secs())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		let secs = u64::deserialize(deserializer)?;
		Ok(Duration::from_secs(secs))
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	/// Directive understood by `tracing_subscriber::EnvFilter`.
	pub fn as_directive(&self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

impl FromStr for LogLevel {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"error" => Ok(LogLevel::Error),
			"warn" | "warning" => Ok(LogLevel::Warn),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			"trace" => Ok(LogLevel::Trace),
			other => Err(ConfigError::invalid_value(
				"logging.level",
				format!("unknown level '{other}'"),
			)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
	Compact,
}

impl FromStr for LogFormat {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"pretty" => Ok(LogFormat::Pretty),
			"json" => Ok(LogFormat::Json),
			"compact" => Ok(LogFormat::Compact),
			other => Err(ConfigError::invalid_value(
				"logging.format",
				format!("unknown format '{other}'"),
			)),
		}
	}
}

impl ClientConfig {
	/// Resolve a merged layer into a validated configuration.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		let server = layer.server.unwrap_or_default();
		let i18n = layer.i18n.unwrap_or_default();
		let theme = layer.theme.unwrap_or_default();
		let cache = layer.cache.unwrap_or_default();
		let storage = layer.storage.unwrap_or_default();
		let logging = layer.logging.unwrap_or_default();

		let base_url = server
			.base_url
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
			.trim_end_matches('/')
			.to_string();
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(ConfigError::InvalidBaseUrl(base_url));
		}

		let request_timeout = server
			.request_timeout_secs
			.map(Duration::from_secs)
			.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
		if request_timeout.is_zero() {
			return Err(ConfigError::invalid_value(
				"server.request_timeout_secs",
				"must be greater than zero",
			));
		}

		let default_locale = i18n
			.default_locale
			.unwrap_or_else(|| DEFAULT_LOCALE.to_string());
		let locales = i18n.locales.unwrap_or_else(|| {
			LocaleRegistry::builtin().locales().to_vec()
		});
		if !locales.iter().any(|l| l.code == default_locale) {
			return Err(ConfigError::UnknownDefaultLocale(default_locale));
		}

		let default_theme = theme
			.default_theme
			.unwrap_or_else(|| DEFAULT_THEME.to_string());
		let mut themes = theme
			.themes
			.unwrap_or_else(|| vec![DEFAULT_THEME.to_string()]);
		if !themes.contains(&default_theme) {
			themes.insert(0, default_theme.clone());
		}

		let dedupe_interval = cache
			.dedupe_interval_secs
			.map(Duration::from_secs)
			.unwrap_or(DEFAULT_DEDUPE_INTERVAL);

		let storage_path = storage.path.unwrap_or_else(|| paths.storage_file());

		let logging = LoggingConfig {
			level: logging
				.level
				.as_deref()
				.map(str::parse)
				.transpose()?
				.unwrap_or_default(),
			format: logging
				.format
				.as_deref()
				.map(str::parse)
				.transpose()?
				.unwrap_or_default(),
		};

		Ok(Self {
			base_url,
			request_timeout,
			default_locale,
			locales,
			default_theme,
			themes,
			dedupe_interval,
			storage_path,
			logging,
			paths,
		})
	}

	/// The supported-locale set described by this configuration.
	pub fn locale_registry(&self) -> LocaleRegistry {
		LocaleRegistry::new(self.locales.clone(), self.default_locale.clone())
	}
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self::from_layer(ConfigLayer::default(), PathsConfig::default())
			.unwrap_or_else(|_| unreachable!("built-in defaults are valid"))
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use crate::layer::ServerLayer;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn base_url_never_ends_with_slash(host in "[a-z]{1,12}(\\.[a-z]{2,4})?", slashes in 0usize..4) {
			let raw = format!("https://{host}{}", "/".repeat(slashes));
			let layer = ConfigLayer {
				server: Some(ServerLayer {
					base_url: Some(raw),
					..Default::default()
				}),
				..Default::default()
			};
			let config = ClientConfig::from_layer(layer, PathsConfig::default()).unwrap();
			prop_assert!(!config.base_url.ends_with('/'));
			prop_assert_eq!(config.base_url, format!("https://{host}"));
		}
	}
}
