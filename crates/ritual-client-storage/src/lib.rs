// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Durable client-side storage for the ritual clients.
//!
//! This is the native counterpart of browser `localStorage`: a flat string
//! key/value map that survives restarts. The auth token, selected locale and
//! selected theme each live under their own key and are restored
//! independently.
//!
//! # Features
//!
//! - **DurableStore trait**: Abstract interface for storage backends
//! - **FileStore**: JSON file-based storage with restricted permissions
//! - **MemoryStore**: In-memory storage for testing
//! - **load_string / load_json**: Reads that treat corrupt or placeholder
//!   values as absent instead of failing
//!
//! # Example
//!
//! ```rust,no_run
//! use ritual_client_storage::{keys, load_string, DurableStore, FileStore};
//!
//! # tokio_test::block_on(async {
//! let store = FileStore::new("/tmp/ritual/storage.json");
//! store.set(keys::AUTH_TOKEN, "token-123").await.unwrap();
//!
//! let token = load_string(&store, keys::AUTH_TOKEN).await;
//! assert_eq!(token.as_deref(), Some("token-123"));
//! # });
//! ```

mod error;
pub mod keys;
mod store;
mod typed;

pub use error::StorageError;
pub use store::{DurableStore, FileStore, MemoryStore, PersistedStore};
pub use typed::{load_json, load_string, remove_keys, save_json};
