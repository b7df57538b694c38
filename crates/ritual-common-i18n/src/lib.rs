// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization support for the ritual clients.
//!
//! Translations are not compiled in. They are fetched from the backend as
//! flat key → string maps and merged into a [`TranslationTable`] at runtime.
//!
//! # String Naming Convention
//!
//! Keys use hierarchical dot notation. Keys starting with `error.` are
//! message keys: the request layer produces them for failures it cannot
//! describe any better, and the UI translates them instead of printing them.
//!
//! # Example
//!
//! ```
//! use ritual_common_i18n::{api_locale, LocaleRegistry, TranslationTable};
//!
//! assert_eq!(api_locale("en-US", "zh"), "en");
//!
//! let registry = LocaleRegistry::builtin();
//! assert!(registry.is_supported("zh"));
//! assert_eq!(registry.resolve(Some("fr")), "zh");
//!
//! let mut table = TranslationTable::new("zh");
//! table.merge("en", [("auth.login".to_string(), "Log in".to_string())]);
//! assert_eq!(table.translate("en", "auth.login"), "Log in");
//! ```

mod locale;
mod message;
mod resolve;
mod table;

pub use locale::{LocaleInfo, LocaleRegistry, DEFAULT_LOCALE};
pub use message::{is_message_key, MESSAGE_KEY_PREFIX};
pub use resolve::api_locale;
pub use table::TranslationTable;
