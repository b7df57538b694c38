// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime translation table fed from backend language strings.

use std::collections::HashMap;

/// Per-locale flat key → string bundles.
///
/// Lookups fall back from the requested locale to the fallback locale and
/// finally to the key itself, so a missing string never renders empty.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
	bundles: HashMap<String, HashMap<String, String>>,
	fallback_locale: String,
}

impl TranslationTable {
	pub fn new(fallback_locale: impl Into<String>) -> Self {
		Self {
			bundles: HashMap::new(),
			fallback_locale: fallback_locale.into(),
		}
	}

	/// Merges strings into a locale's bundle, overwriting existing keys.
	///
	/// Returns the number of strings merged.
	pub fn merge<I>(&mut self, locale: &str, strings: I) -> usize
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let bundle = self.bundles.entry(locale.to_string()).or_default();
		let mut merged = 0;
		for (key, value) in strings {
			bundle.insert(key, value);
			merged += 1;
		}
		tracing::debug!(locale, merged, total = bundle.len(), "merged translation bundle");
		merged
	}

	/// Looks up a key without any fallback.
	pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
		self.bundles
			.get(locale)
			.and_then(|b| b.get(key))
			.map(String::as_str)
	}

	/// Translates a key for `locale`, falling back to the fallback locale and
	/// then to the key.
	pub fn translate(&self, locale: &str, key: &str) -> String {
		self.get(locale, key)
			.or_else(|| self.get(&self.fallback_locale, key))
			.unwrap_or(key)
			.to_string()
	}

	/// Returns true if any strings are loaded for `locale`.
	pub fn has_locale(&self, locale: &str) -> bool {
		self.bundles.get(locale).is_some_and(|b| !b.is_empty())
	}

	pub fn len(&self, locale: &str) -> usize {
		self.bundles.get(locale).map_or(0, HashMap::len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
		items
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_merge_overwrites_existing_keys() {
		let mut table = TranslationTable::new("zh");
		table.merge("en", pairs(&[("a", "one"), ("b", "two")]));
		table.merge("en", pairs(&[("b", "TWO")]));

		assert_eq!(table.translate("en", "a"), "one");
		assert_eq!(table.translate("en", "b"), "TWO");
		assert_eq!(table.len("en"), 2);
	}

	#[test]
	fn test_falls_back_to_fallback_locale() {
		let mut table = TranslationTable::new("zh");
		table.merge("zh", pairs(&[("auth.login", "登录")]));
		assert_eq!(table.translate("en", "auth.login"), "登录");
	}

	#[test]
	fn test_missing_key_returns_key() {
		let table = TranslationTable::new("zh");
		assert_eq!(table.translate("en", "result.title"), "result.title");
		assert!(!table.has_locale("en"));
	}

	#[test]
	fn test_merge_from_json_object() {
		let mut table = TranslationTable::new("zh");
		let strings: HashMap<String, String> =
			serde_json::from_str(r#"{"error.forbidden":"Forbidden"}"#).unwrap();
		assert_eq!(table.merge("en", strings), 1);
		assert_eq!(table.get("en", "error.forbidden"), Some("Forbidden"));
	}
}
