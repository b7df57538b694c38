// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::StorageError;

/// On-disk storage format.
pub type PersistedStore = HashMap<String, String>;

/// Trait for durable storage backends.
///
/// Values are opaque strings; structured values are JSON-encoded by the
/// caller (see [`crate::save_json`]).
#[async_trait]
pub trait DurableStore: Send + Sync + std::fmt::Debug {
	/// Read the raw value stored under `key`.
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Store `value` under `key`, replacing any previous value.
	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Remove `key`. Removing a missing key is not an error.
	async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-based store holding a single JSON object.
///
/// The file is written with restricted permissions (0600 on Unix) since it
/// carries bearer tokens. A file that cannot be parsed is treated as empty so
/// a corrupt store never prevents startup; the next write replaces it.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	write_lock: Mutex<()>,
}

impl FileStore {
	/// Create a new file store at the given path.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			write_lock: Mutex::new(()),
		}
	}

	/// Get the path to the storage file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Read the entire store from disk.
	pub async fn read_store(&self) -> Result<PersistedStore, StorageError> {
		if !self.path.exists() {
			return Ok(HashMap::new());
		}

		let contents = fs::read_to_string(&self.path).await?;
		if contents.trim().is_empty() {
			return Ok(HashMap::new());
		}

		match serde_json::from_str::<PersistedStore>(&contents) {
			Ok(store) => Ok(store),
			Err(e) => {
				warn!(path = ?self.path, error = %e, "storage file is corrupt, treating as empty");
				Ok(HashMap::new())
			}
		}
	}

	async fn write_store(&self, store: &PersistedStore) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).await?;
		}

		let contents = serde_json::to_string_pretty(store)?;

		let temp_path = self.path.with_extension("tmp");
		let mut file = fs::File::create(&temp_path).await?;
		file.write_all(contents.as_bytes()).await?;
		file.sync_all().await?;
		drop(file);

		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			let perms = std::fs::Permissions::from_mode(0o600);
			if let Err(e) = std::fs::set_permissions(&temp_path, perms) {
				warn!(path = ?temp_path, error = %e, "Failed to set file permissions to 0600");
			}
		}

		fs::rename(&temp_path, &self.path).await?;

		debug!(path = ?self.path, keys = store.len(), "storage file written");
		Ok(())
	}
}

#[async_trait]
impl DurableStore for FileStore {
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		let store = self.read_store().await?;
		Ok(store.get(key).cloned())
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		let mut store = self.read_store().await?;
		store.insert(key.to_string(), value.to_string());
		self.write_store(&store).await
	}

	async fn remove(&self, key: &str) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		let mut store = self.read_store().await?;
		if store.remove(key).is_none() {
			return Ok(());
		}
		self.write_store(&store).await
	}
}

/// In-memory store for testing.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
	/// Create a new empty in-memory store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store pre-populated with `entries`.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			values: RwLock::new(
				entries
					.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}
}

#[async_trait]
impl DurableStore for MemoryStore {
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.values.read().await.get(key).cloned())
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self
			.values
			.write()
			.await
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.values.write().await.remove(key);
		Ok(())
	}
}
