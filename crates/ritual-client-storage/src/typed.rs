// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lenient reads and JSON-encoded values on top of [`DurableStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StorageError;
use crate::store::DurableStore;

/// Placeholder strings left behind by careless writers; read as absent.
const ABSENT_MARKERS: [&str; 3] = ["", "undefined", "null"];

/// Reads a string value, treating placeholders and read failures as absent.
///
/// Startup must never fail because of storage, so errors are logged and
/// swallowed here.
pub async fn load_string(store: &dyn DurableStore, key: &str) -> Option<String> {
	match store.get(key).await {
		Ok(Some(value)) if !ABSENT_MARKERS.contains(&value.trim()) => Some(value),
		Ok(_) => None,
		Err(e) => {
			warn!(key, error = %e, "failed to read storage key, treating as absent");
			None
		}
	}
}

/// Reads a JSON-encoded value.
///
/// A value that does not decode is removed from storage and read as absent.
pub async fn load_json<T: DeserializeOwned>(store: &dyn DurableStore, key: &str) -> Option<T> {
	let raw = load_string(store, key).await?;
	match serde_json::from_str(&raw) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!(key, error = %e, "discarding corrupt storage value");
			if let Err(e) = store.remove(key).await {
				warn!(key, error = %e, "failed to remove corrupt storage value");
			}
			None
		}
	}
}

/// Stores `value` JSON-encoded, or removes the key when `value` is `None`.
pub async fn save_json<T: Serialize>(
	store: &dyn DurableStore,
	key: &str,
	value: Option<&T>,
) -> Result<(), StorageError> {
	match value {
		Some(value) => {
			let encoded = serde_json::to_string(value)?;
			store.set(key, &encoded).await
		}
		None => store.remove(key).await,
	}
}

/// Removes every key, attempting all of them even if one fails.
///
/// Returns the first error encountered.
pub async fn remove_keys(store: &dyn DurableStore, keys: &[&str]) -> Result<(), StorageError> {
	let mut first_error = None;
	for key in keys {
		if let Err(e) = store.remove(key).await {
			warn!(key, error = %e, "failed to remove storage key");
			first_error.get_or_insert(e);
		}
	}
	match first_error {
		Some(e) => Err(e),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::keys;
	use crate::store::MemoryStore;
	use serde::Deserialize;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Profile {
		id: String,
		username: String,
	}

	#[tokio::test]
	async fn test_placeholders_read_as_absent() {
		for marker in ["", "undefined", "null", "  "] {
			let store = MemoryStore::with_entries([(keys::ADMIN_TOKEN, marker)]);
			assert!(load_string(&store, keys::ADMIN_TOKEN).await.is_none(), "{marker:?}");
		}
	}

	#[tokio::test]
	async fn test_json_roundtrip() {
		let store = MemoryStore::new();
		let profile = Profile {
			id: "1".to_string(),
			username: "admin".to_string(),
		};
		save_json(&store, keys::ADMIN_USER, Some(&profile)).await.unwrap();
		let loaded: Option<Profile> = load_json(&store, keys::ADMIN_USER).await;
		assert_eq!(loaded, Some(profile));

		save_json::<Profile>(&store, keys::ADMIN_USER, None).await.unwrap();
		assert!(store.get(keys::ADMIN_USER).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_corrupt_json_is_removed() {
		let store = MemoryStore::with_entries([(keys::ADMIN_USER, "{broken")]);
		let loaded: Option<Profile> = load_json(&store, keys::ADMIN_USER).await;
		assert!(loaded.is_none());
		assert!(store.get(keys::ADMIN_USER).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_remove_keys_clears_all() {
		let store = MemoryStore::with_entries([(keys::ADMIN_TOKEN, "t"), (keys::ADMIN_USER, "{}")]);
		remove_keys(&store, &[keys::ADMIN_TOKEN, keys::ADMIN_USER])
			.await
			.unwrap();
		assert!(store.get(keys::ADMIN_TOKEN).await.unwrap().is_none());
		assert!(store.get(keys::ADMIN_USER).await.unwrap().is_none());
	}
}
