// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keyed query cache with request de-duplication.
//!
//! Each key maps to either an in-flight request, shared by every caller that
//! asks for the same key, or a settled value stamped with when it landed.
//! Settled values are reused until the de-duplication window elapses.
//!
//! Every slot carries a generation number. A request only writes its outcome
//! back if its slot still has the generation it was started with, so an
//! invalidated or replaced key is never overwritten by a late response.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

enum Slot<V> {
	InFlight {
		generation: u64,
		fetch: SharedFetch<V>,
	},
	Settled {
		generation: u64,
		value: V,
		fetched_at: Instant,
	},
}

impl<V> Slot<V> {
	fn generation(&self) -> u64 {
		match self {
			Slot::InFlight { generation, .. } | Slot::Settled { generation, .. } => *generation,
		}
	}
}

struct QueryCacheInner<K, V> {
	slots: Mutex<HashMap<K, Slot<V>>>,
	dedupe_interval: Duration,
	next_generation: AtomicU64,
}

/// Cache of query results keyed by `K`. Clones share the same slots.
pub struct QueryCache<K, V> {
	inner: Arc<QueryCacheInner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<K, V> fmt::Debug for QueryCache<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryCache")
			.field("dedupe_interval", &self.inner.dedupe_interval)
			.finish_non_exhaustive()
	}
}

impl<K, V> QueryCache<K, V>
where
	K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	pub fn new(dedupe_interval: Duration) -> Self {
		Self {
			inner: Arc::new(QueryCacheInner {
				slots: Mutex::new(HashMap::new()),
				dedupe_interval,
				next_generation: AtomicU64::new(1),
			}),
		}
	}

	pub fn dedupe_interval(&self) -> Duration {
		self.inner.dedupe_interval
	}

	/// Returns the value for `key`, calling `fetcher` only when there is
	/// neither a fresh settled value nor a request already in flight.
	///
	/// Failures are handed to every waiting caller but never cached.
	pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> Result<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V>> + Send + 'static,
	{
		let (generation, fetch) = {
			let mut slots = self.inner.slots.lock().await;
			match slots.get(&key) {
				Some(Slot::Settled {
					value, fetched_at, ..
				}) if fetched_at.elapsed() < self.inner.dedupe_interval => {
					debug!(key = ?key, "query cache hit");
					return Ok(value.clone());
				}
				Some(Slot::InFlight { generation, fetch }) => {
					debug!(key = ?key, "joining in-flight query");
					(*generation, fetch.clone())
				}
				_ => {
					let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
					let fetch = fetcher().boxed().shared();
					debug!(key = ?key, generation, "starting query");
					slots.insert(
						key.clone(),
						Slot::InFlight {
							generation,
							fetch: fetch.clone(),
						},
					);
					(generation, fetch)
				}
			}
		};

		let outcome = fetch.await;

		let mut slots = self.inner.slots.lock().await;
		let still_current = matches!(
			slots.get(&key),
			Some(slot @ Slot::InFlight { .. }) if slot.generation() == generation
		);
		if still_current {
			match &outcome {
				Ok(value) => {
					slots.insert(
						key,
						Slot::Settled {
							generation,
							value: value.clone(),
							fetched_at: Instant::now(),
						},
					);
				}
				Err(_) => {
					slots.remove(&key);
				}
			}
		}

		outcome
	}

	/// Settled value for `key`, regardless of age.
	pub async fn peek(&self, key: &K) -> Option<V> {
		match self.inner.slots.lock().await.get(key) {
			Some(Slot::Settled { value, .. }) => Some(value.clone()),
			_ => None,
		}
	}

	pub async fn is_in_flight(&self, key: &K) -> bool {
		matches!(
			self.inner.slots.lock().await.get(key),
			Some(Slot::InFlight { .. })
		)
	}

	/// Discards the slot for `key`. An in-flight request keeps running for
	/// whoever awaits it but its result is not stored.
	pub async fn invalidate(&self, key: &K) -> bool {
		let removed = self.inner.slots.lock().await.remove(key).is_some();
		if removed {
			debug!(key = ?key, "invalidated query");
		}
		removed
	}

	/// Discards every slot matching `predicate`.
	pub async fn invalidate_where(&self, mut predicate: impl FnMut(&K) -> bool) -> usize {
		let mut slots = self.inner.slots.lock().await;
		let before = slots.len();
		slots.retain(|key, _| !predicate(key));
		before - slots.len()
	}

	pub async fn clear(&self) {
		self.inner.slots.lock().await.clear();
	}

	pub async fn len(&self) -> usize {
		self.inner.slots.lock().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}
