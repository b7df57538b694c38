// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use std::path::PathBuf;

use ritual_common_i18n::LocaleInfo;
use serde::Deserialize;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub server: Option<ServerLayer>,
	#[serde(default)]
	pub i18n: Option<I18nLayer>,
	#[serde(default)]
	pub theme: Option<ThemeLayer>,
	#[serde(default)]
	pub cache: Option<CacheLayer>,
	#[serde(default)]
	pub storage: Option<StorageLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct I18nLayer {
	#[serde(default)]
	pub default_locale: Option<String>,
	#[serde(default)]
	pub locales: Option<Vec<LocaleInfo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeLayer {
	#[serde(default)]
	pub default_theme: Option<String>,
	#[serde(default)]
	pub themes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheLayer {
	#[serde(default)]
	pub dedupe_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageLayer {
	#[serde(default)]
	pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl ConfigLayer {
	/// Merge `other` on top of `self`; set fields in `other` win.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.server, other.server, ServerLayer::merge);
		merge_option(&mut self.i18n, other.i18n, I18nLayer::merge);
		merge_option(&mut self.theme, other.theme, ThemeLayer::merge);
		merge_option(&mut self.cache, other.cache, CacheLayer::merge);
		merge_option(&mut self.storage, other.storage, StorageLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

fn overwrite<T>(target: &mut Option<T>, source: Option<T>) {
	if source.is_some() {
		*target = source;
	}
}

impl ServerLayer {
	fn merge(&mut self, other: ServerLayer) {
		overwrite(&mut self.base_url, other.base_url);
		overwrite(&mut self.request_timeout_secs, other.request_timeout_secs);
	}
}

impl I18nLayer {
	fn merge(&mut self, other: I18nLayer) {
		overwrite(&mut self.default_locale, other.default_locale);
		overwrite(&mut self.locales, other.locales);
	}
}

impl ThemeLayer {
	fn merge(&mut self, other: ThemeLayer) {
		overwrite(&mut self.default_theme, other.default_theme);
		overwrite(&mut self.themes, other.themes);
	}
}

impl CacheLayer {
	fn merge(&mut self, other: CacheLayer) {
		overwrite(&mut self.dedupe_interval_secs, other.dedupe_interval_secs);
	}
}

impl StorageLayer {
	fn merge(&mut self, other: StorageLayer) {
		overwrite(&mut self.path, other.path);
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		overwrite(&mut self.level, other.level);
		overwrite(&mut self.format, other.format);
	}
}
