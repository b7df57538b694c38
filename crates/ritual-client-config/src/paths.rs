// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where the clients keep their config file and durable storage.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::ConfigError;

const APP_DIR: &str = "ritual";
const CONFIG_FILE: &str = "config.toml";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
	/// `$XDG_CONFIG_HOME/ritual/config.toml`
	pub user_config_file: PathBuf,
	/// `$XDG_DATA_HOME/ritual`, home of the storage file.
	pub data_dir: PathBuf,
}

impl PathsConfig {
	/// Lays out paths under `home`, letting `var` supply `XDG_CONFIG_HOME`
	/// and `XDG_DATA_HOME`. Empty values count as unset.
	pub fn from_home(home: &Path, var: impl Fn(&str) -> Option<OsString>) -> Self {
		let dir = |name: &str, fallback: &str| {
			var(name)
				.filter(|v| !v.is_empty())
				.map(PathBuf::from)
				.unwrap_or_else(|| home.join(fallback))
		};
		let config_home = dir("XDG_CONFIG_HOME", ".config");
		let data_home = dir("XDG_DATA_HOME", ".local/share");

		Self {
			user_config_file: config_home.join(APP_DIR).join(CONFIG_FILE),
			data_dir: data_home.join(APP_DIR),
		}
	}

	pub fn storage_file(&self) -> PathBuf {
		self.data_dir.join(STORAGE_FILE)
	}
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self::from_home(Path::new("~"), |_| None)
	}
}

/// Resolves paths for the current user from the process environment.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
	let paths = PathsConfig::from_home(&home, |name| std::env::var_os(name));
	tracing::debug!(
		config_file = %paths.user_config_file.display(),
		data_dir = %paths.data_dir.display(),
		"resolved paths"
	);
	Ok(paths)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_falls_back_to_home() {
		let paths = PathsConfig::from_home(Path::new("/home/ada"), |_| None);
		assert_eq!(
			paths.user_config_file,
			PathBuf::from("/home/ada/.config/ritual/config.toml")
		);
		assert_eq!(
			paths.storage_file(),
			PathBuf::from("/home/ada/.local/share/ritual/storage.json")
		);
	}

	#[test]
	fn test_xdg_overrides_and_blank_values() {
		let paths = PathsConfig::from_home(Path::new("/home/ada"), |name| match name {
			"XDG_CONFIG_HOME" => Some(OsString::from("/etc/xdg")),
			"XDG_DATA_HOME" => Some(OsString::new()),
			_ => None,
		});
		assert_eq!(
			paths.user_config_file,
			PathBuf::from("/etc/xdg/ritual/config.toml")
		);
		assert_eq!(paths.data_dir, PathBuf::from("/home/ada/.local/share/ritual"));
	}

	#[test]
	fn test_default_is_tilde_relative() {
		assert_eq!(
			PathsConfig::default().storage_file(),
			PathBuf::from("~/.local/share/ritual/storage.json")
		);
	}
}
