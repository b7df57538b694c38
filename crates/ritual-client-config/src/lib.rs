// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the ritual clients.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides
//! - Configuration validation

pub mod error;
pub mod layer;
pub mod paths;
pub mod runtime;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use runtime::{ClientConfig, LogFormat, LogLevel, LoggingConfig};
pub use sources::CliOverrides;

/// Load configuration from defaults, the user config file and environment.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
	load_config_with_cli(CliOverrides::default())
}

/// Load configuration with CLI overrides applied last.
///
/// Precedence, lowest to highest: built-in defaults, user config file
/// (`~/.config/ritual/config.toml` or `--config`), `RITUAL_*` environment
/// variables, command-line flags.
pub fn load_config_with_cli(cli: CliOverrides) -> Result<ClientConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let config_file = cli
		.config_file
		.clone()
		.unwrap_or_else(|| paths.user_config_file.clone());

	let mut layer = ConfigLayer::default();
	layer.merge(sources::load_file(&config_file)?);
	layer.merge(sources::load_env(std::env::vars()));
	layer.merge(cli.into_layer());

	ClientConfig::from_layer(layer, paths)
}
