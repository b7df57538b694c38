// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale metadata and the supported-locale registry.

use serde::{Deserialize, Serialize};

/// Default locale used as fallback.
pub const DEFAULT_LOCALE: &str = "zh";

/// Metadata about a supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
	/// Primary language subtag (e.g., "zh", "en")
	pub code: String,
	/// Name shown in the language switcher
	pub display_name: String,
}

impl LocaleInfo {
	pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			display_name: display_name.into(),
		}
	}
}

/// The statically known set of locales a client accepts.
///
/// The first entry doubles as the switcher's fallback selection when the
/// active locale is somehow not in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRegistry {
	locales: Vec<LocaleInfo>,
	default_locale: String,
}

impl LocaleRegistry {
	/// Builds a registry. The default locale is added to the set if missing.
	pub fn new(locales: Vec<LocaleInfo>, default_locale: impl Into<String>) -> Self {
		let default_locale = default_locale.into();
		let mut locales = locales;
		if !locales.iter().any(|l| l.code == default_locale) {
			locales.insert(0, LocaleInfo::new(default_locale.clone(), default_locale.clone()));
		}
		Self {
			locales,
			default_locale,
		}
	}

	/// Chinese and English, defaulting to Chinese.
	pub fn builtin() -> Self {
		Self::new(
			vec![LocaleInfo::new("zh", "中文"), LocaleInfo::new("en", "English")],
			DEFAULT_LOCALE,
		)
	}

	pub fn default_locale(&self) -> &str {
		&self.default_locale
	}

	pub fn locales(&self) -> &[LocaleInfo] {
		&self.locales
	}

	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.locales.iter().map(|l| l.code.as_str())
	}

	/// Returns true if `code` is exactly one of the supported codes.
	pub fn is_supported(&self, code: &str) -> bool {
		self.locales.iter().any(|l| l.code == code)
	}

	/// Returns the display name for a code, or the code itself.
	pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
		self.locales
			.iter()
			.find(|l| l.code == code)
			.map(|l| l.display_name.as_str())
			.unwrap_or(code)
	}

	/// Resolves a persisted or requested locale against the registry.
	///
	/// Absent, empty, corrupt or unsupported values fall back to the default
	/// locale.
	pub fn resolve(&self, candidate: Option<&str>) -> String {
		match candidate.map(str::trim) {
			Some(code) if self.is_supported(code) => code.to_string(),
			_ => self.default_locale.clone(),
		}
	}
}

impl Default for LocaleRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}
