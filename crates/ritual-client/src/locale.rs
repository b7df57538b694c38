// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale controller.
//!
//! Owns the active-locale cell, the persisted locale key and the runtime
//! translation table. A switch loads and merges the target locale's strings
//! first, persists the choice, and only then flips the cell, so readers never
//! observe the new locale before its strings are in place.

use std::sync::Arc;

use ritual_client_storage::{keys, load_string, DurableStore};
use ritual_common_i18n::{api_locale, is_message_key, LocaleRegistry, TranslationTable};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{ApiError, Result};
use crate::request::ApiClient;
use crate::state::{cell, CellReader, CellWriter};

struct LocaleInner {
	cell: CellWriter<String>,
	registry: LocaleRegistry,
	table: RwLock<TranslationTable>,
	store: Arc<dyn DurableStore>,
}

#[derive(Clone)]
pub struct LocaleController {
	inner: Arc<LocaleInner>,
}

impl std::fmt::Debug for LocaleController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocaleController")
			.field("current", &self.current())
			.field("registry", &self.inner.registry)
			.finish()
	}
}

impl LocaleController {
	/// Restores the persisted locale, falling back to the registry default
	/// for anything absent or unsupported.
	pub async fn restore(store: Arc<dyn DurableStore>, registry: LocaleRegistry) -> Self {
		let saved = load_string(store.as_ref(), keys::LOCALE).await;
		let initial = registry.resolve(saved.as_deref());
		if saved.as_deref().is_some_and(|saved| saved != initial) {
			debug!(saved = ?saved, locale = %initial, "persisted locale unusable, using default");
		}
		Self::with_locale(store, registry, initial)
	}

	fn with_locale(store: Arc<dyn DurableStore>, registry: LocaleRegistry, initial: String) -> Self {
		let table = TranslationTable::new(registry.default_locale());
		let (cell, _) = cell(initial);
		Self {
			inner: Arc::new(LocaleInner {
				cell,
				registry,
				table: RwLock::new(table),
				store,
			}),
		}
	}

	pub fn subscribe(&self) -> CellReader<String> {
		self.inner.cell.reader()
	}

	pub fn current(&self) -> String {
		self.inner.cell.get()
	}

	pub fn registry(&self) -> &LocaleRegistry {
		&self.inner.registry
	}

	/// Primary subtag of the active locale, as sent to the backend.
	pub fn api_locale(&self) -> String {
		api_locale(&self.current(), self.inner.registry.default_locale())
	}

	/// Loads strings for the active locale. Called once at startup.
	pub async fn load_initial(&self, api: &ApiClient) {
		let current = self.current();
		self.load_resources(api, &current).await;
	}

	/// Switches to `code`.
	///
	/// Unsupported codes are ignored and `false` is returned. A failed string
	/// fetch does not stop the switch; earlier strings remain as fallback.
	#[instrument(skip(self, api))]
	pub async fn set_locale(&self, api: &ApiClient, code: &str) -> bool {
		if !self.inner.registry.is_supported(code) {
			debug!("unsupported locale, ignoring");
			return false;
		}

		self.load_resources(api, code).await;

		if let Err(e) = self.inner.store.set(keys::LOCALE, code).await {
			warn!(error = %e, "failed to persist locale");
		}
		self.inner.cell.set(code.to_string());
		info!(locale = code, "locale switched");
		true
	}

	/// Fetches and merges the backend strings for `code`.
	///
	/// Returns the number of strings merged; failures are logged and count
	/// as zero.
	pub async fn load_resources(&self, api: &ApiClient, code: &str) -> usize {
		match fetch_language_strings(api, code, self.inner.registry.default_locale()).await {
			Ok(strings) => {
				let mut table = self.inner.table.write().await;
				table.merge(code, strings)
			}
			Err(e) => {
				warn!(locale = code, error = %e.detail(), "failed to load language strings");
				0
			}
		}
	}

	/// Merges strings that did not come from the backend, such as bundled
	/// defaults.
	pub async fn merge_strings<I>(&self, code: &str, strings: I) -> usize
	where
		I: IntoIterator<Item = (String, String)>,
	{
		self.inner.table.write().await.merge(code, strings)
	}

	/// Translates `key` in the active locale, falling back to the default
	/// locale and then to the key itself.
	pub async fn translate(&self, key: &str) -> String {
		let current = self.current();
		self.inner.table.read().await.translate(&current, key)
	}

	/// Text to show for a failed request.
	///
	/// `error.*` keys go through the translation table, anything else is the
	/// backend's own wording.
	pub async fn describe_error(&self, error: &ApiError) -> String {
		self.describe_message(&error.message()).await
	}

	pub async fn describe_message(&self, message: &str) -> String {
		if is_message_key(message) {
			self.translate(message).await
		} else {
			message.to_string()
		}
	}
}

/// `GET /api/language-strings?locale=<code>`, flattened to dotted keys.
async fn fetch_language_strings(
	api: &ApiClient,
	code: &str,
	default_locale: &str,
) -> Result<Vec<(String, String)>> {
	let body: Map<String, Value> = api
		.get("/api/language-strings")
		.anonymous()
		.query("locale", api_locale(code, default_locale))
		.send()
		.await?;

	let mut strings = Vec::with_capacity(body.len());
	flatten_into(&mut strings, None, body);
	Ok(strings)
}

/// Nested objects become `parent.child` keys; non-string leaves are dropped.
fn flatten_into(out: &mut Vec<(String, String)>, prefix: Option<&str>, map: Map<String, Value>) {
	for (key, value) in map {
		let key = match prefix {
			Some(prefix) => format!("{prefix}.{key}"),
			None => key,
		};
		match value {
			Value::String(text) => out.push((key, text)),
			Value::Object(nested) => flatten_into(out, Some(key.as_str()), nested),
			_ => {}
		}
	}
}
