// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Theme preference.

use std::sync::Arc;

use ritual_client_storage::{keys, load_string, DurableStore};
use tracing::{debug, info, warn};

use crate::state::{cell, CellReader, CellWriter};

/// Owner of the selected-theme cell and its storage key.
#[derive(Debug)]
pub struct ThemeController {
	cell: CellWriter<String>,
	themes: Vec<String>,
	store: Arc<dyn DurableStore>,
}

impl ThemeController {
	/// Restores the persisted theme; anything not in `themes` falls back to
	/// `default_theme`.
	pub async fn restore(
		store: Arc<dyn DurableStore>,
		themes: Vec<String>,
		default_theme: impl Into<String>,
	) -> Self {
		let default_theme = default_theme.into();
		let initial = match load_string(store.as_ref(), keys::THEME).await {
			Some(saved) if themes.contains(&saved) => saved,
			saved => {
				if saved.is_some() {
					debug!(saved = ?saved, "unknown persisted theme, using default");
				}
				default_theme
			}
		};
		let (cell, _) = cell(initial);
		Self {
			cell,
			themes,
			store,
		}
	}

	pub fn current(&self) -> String {
		self.cell.get()
	}

	pub fn themes(&self) -> &[String] {
		&self.themes
	}

	pub fn subscribe(&self) -> CellReader<String> {
		self.cell.reader()
	}

	/// Selects and persists `id`. Unknown ids are ignored.
	pub async fn set_theme(&self, id: &str) -> bool {
		if !self.themes.iter().any(|theme| theme == id) {
			debug!(theme = id, "unknown theme, ignoring");
			return false;
		}
		if let Err(e) = self.store.set(keys::THEME, id).await {
			warn!(error = %e, "failed to persist theme");
		}
		self.cell.set(id.to_string());
		info!(theme = id, "theme switched");
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ritual_client_storage::MemoryStore;

	fn themes() -> Vec<String> {
		vec!["xiaohongshu".to_string(), "midnight".to_string()]
	}

	#[tokio::test]
	async fn test_restore_known_theme() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::THEME, "midnight")]));
		let theme = ThemeController::restore(store, themes(), "xiaohongshu").await;
		assert_eq!(theme.current(), "midnight");
	}

	#[tokio::test]
	async fn test_restore_unknown_theme_falls_back() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::THEME, "neon")]));
		let theme = ThemeController::restore(store, themes(), "xiaohongshu").await;
		assert_eq!(theme.current(), "xiaohongshu");
	}

	#[tokio::test]
	async fn test_set_theme_persists_and_ignores_unknown() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
		let theme = ThemeController::restore(store.clone(), themes(), "xiaohongshu").await;

		assert!(!theme.set_theme("neon").await);
		assert_eq!(theme.current(), "xiaohongshu");
		assert_eq!(store.get(keys::THEME).await.unwrap(), None);

		assert!(theme.set_theme("midnight").await);
		assert_eq!(theme.current(), "midnight");
		assert_eq!(
			store.get(keys::THEME).await.unwrap().as_deref(),
			Some("midnight")
		);
	}
}
