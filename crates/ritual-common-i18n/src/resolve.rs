// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale tag negotiation.

/// Derives the locale sent to the backend from a display-language tag.
///
/// Strips region and script subtags and lowercases the primary language
/// subtag. Empty or unparseable input yields `default_locale`.
///
/// The result is used both as the `Accept-Language` header and as the
/// explicit `locale` parameter for endpoints that expect it positionally.
///
/// # Example
///
/// ```
/// use ritual_common_i18n::api_locale;
///
/// assert_eq!(api_locale("en-US", "zh"), "en");
/// assert_eq!(api_locale("ZH-Hans-CN", "zh"), "zh");
/// assert_eq!(api_locale("", "zh"), "zh");
/// ```
pub fn api_locale(tag: &str, default_locale: &str) -> String {
	let primary = tag
		.trim()
		.split(['-', '_'])
		.next()
		.unwrap_or_default()
		.to_ascii_lowercase();

	if primary.is_empty() || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
		return default_locale.to_string();
	}

	primary
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_strips_region() {
		assert_eq!(api_locale("en-US", "zh"), "en");
		assert_eq!(api_locale("en_GB", "zh"), "en");
	}

	#[test]
	fn test_strips_script_and_region() {
		assert_eq!(api_locale("ZH-Hans-CN", "zh"), "zh");
	}

	#[test]
	fn test_empty_uses_default() {
		assert_eq!(api_locale("", "zh"), "zh");
		assert_eq!(api_locale("   ", "en"), "en");
		assert_eq!(api_locale("-US", "zh"), "zh");
	}

	#[test]
	fn test_garbage_uses_default() {
		assert_eq!(api_locale("1234", "zh"), "zh");
		assert_eq!(api_locale("*", "zh"), "zh");
	}

	#[test]
	fn test_plain_code_is_lowercased() {
		assert_eq!(api_locale("EN", "zh"), "en");
		assert_eq!(api_locale(" ja ", "zh"), "ja");
	}
}
