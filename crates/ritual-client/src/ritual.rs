// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cached binding for the ritual calculation.
//!
//! The query key is `(deathDate, petName, locale)`. Submitting new params or
//! switching locale changes the key, and a changed key is the only thing that
//! causes a new `POST /api/calculate`. Results are tagged with the key they
//! were fetched for and are only shown while that key is current, so a
//! result in the old language is never visible after a locale switch.

use std::sync::Arc;

use ritual_common_i18n::api_locale;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{ApiError, Result};
use crate::query::QueryCache;
use crate::request::ApiClient;
use crate::state::CellReader;

/// One suggested burning date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurningDateItem {
	pub date: String,
	pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
	pub pet_months: i64,
	pub death_date: String,
	#[serde(default)]
	pub pet_name: String,
	pub suggested_quantity: i64,
	#[serde(default)]
	pub burning_dates: Vec<BurningDateItem>,
	#[serde(default)]
	pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
	pub death_date: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pet_name: Option<String>,
	/// Sent alongside `Accept-Language`; the backend reads it positionally.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

/// `POST /api/calculate`
pub async fn calculate(api: &ApiClient, request: &CalculateRequest) -> Result<CalculateResponse> {
	api.post("/api/calculate").json(request).send().await
}

/// What the user submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RitualParams {
	pub death_date: String,
	pub pet_name: Option<String>,
}

impl RitualParams {
	/// A blank pet name is the same as none.
	pub fn new(death_date: impl Into<String>, pet_name: Option<String>) -> Self {
		Self {
			death_date: death_date.into(),
			pet_name: pet_name.filter(|name| !name.trim().is_empty()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RitualKey {
	pub death_date: String,
	pub pet_name: String,
	pub locale: String,
}

impl RitualKey {
	fn request(&self) -> CalculateRequest {
		CalculateRequest {
			death_date: self.death_date.clone(),
			pet_name: (!self.pet_name.is_empty()).then(|| self.pet_name.clone()),
			locale: Some(self.locale.clone()),
		}
	}
}

/// What a view would render right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RitualSnapshot {
	pub params: Option<RitualParams>,
	pub result: Option<CalculateResponse>,
	pub error: Option<ApiError>,
	pub loading: bool,
}

#[derive(Debug, Default)]
struct RitualState {
	params: Option<RitualParams>,
	result: Option<(RitualKey, CalculateResponse)>,
	error: Option<(RitualKey, ApiError)>,
	loading: Option<RitualKey>,
	/// Locale the shown result/error belong to.
	seen_locale: Option<String>,
}

struct RitualInner {
	cache: QueryCache<RitualKey, CalculateResponse>,
	locale: CellReader<String>,
	default_locale: String,
	state: Mutex<RitualState>,
}

#[derive(Clone)]
pub struct RitualQuery {
	inner: Arc<RitualInner>,
}

impl std::fmt::Debug for RitualQuery {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RitualQuery")
			.field("cache", &self.inner.cache)
			.finish_non_exhaustive()
	}
}

impl RitualQuery {
	pub fn new(
		cache: QueryCache<RitualKey, CalculateResponse>,
		locale: CellReader<String>,
		default_locale: impl Into<String>,
	) -> Self {
		Self {
			inner: Arc::new(RitualInner {
				cache,
				locale,
				default_locale: default_locale.into(),
				state: Mutex::new(RitualState::default()),
			}),
		}
	}

	fn current_locale(&self) -> String {
		self.inner
			.locale
			.with(|locale| api_locale(locale, &self.inner.default_locale))
	}

	fn key_for(&self, params: &RitualParams) -> RitualKey {
		RitualKey {
			death_date: params.death_date.clone(),
			pet_name: params.pet_name.clone().unwrap_or_default(),
			locale: self.current_locale(),
		}
	}

	/// Key the current params and locale map to, if anything was submitted.
	pub async fn current_key(&self) -> Option<RitualKey> {
		let state = self.inner.state.lock().await;
		state.params.as_ref().map(|params| self.key_for(params))
	}

	/// Records new params and clears whatever was shown. Does not fetch.
	pub async fn trigger(&self, params: RitualParams) {
		let mut state = self.inner.state.lock().await;
		debug!(death_date = %params.death_date, "ritual params submitted");
		state.params = Some(params);
		state.result = None;
		state.error = None;
		state.seen_locale = Some(self.current_locale());
	}

	/// Clears the shown result and error if the locale moved since they were
	/// produced. Returns true when something was cleared.
	pub async fn sync_locale(&self) -> bool {
		let locale = self.current_locale();
		let mut state = self.inner.state.lock().await;
		let moved = state.seen_locale.as_deref() != Some(locale.as_str());
		state.seen_locale = Some(locale);
		if moved && state.params.is_some() {
			state.result = None;
			state.error = None;
			return true;
		}
		false
	}

	/// Fetches for the current key.
	///
	/// The outcome is only applied if the key is still current once the
	/// response arrives. Returns `None` when nothing has been submitted.
	#[instrument(skip_all)]
	pub async fn refresh(&self, api: &ApiClient) -> Option<Result<CalculateResponse>> {
		let key = {
			let mut state = self.inner.state.lock().await;
			let key = self.key_for(state.params.as_ref()?);
			state.loading = Some(key.clone());
			key
		};

		let api = api.clone();
		let request = key.request();
		let outcome = self
			.inner
			.cache
			.fetch(key.clone(), move || async move { calculate(&api, &request).await })
			.await;

		let mut state = self.inner.state.lock().await;
		if state.loading.as_ref() == Some(&key) {
			state.loading = None;
		}
		let still_current = state.params.as_ref().map(|params| self.key_for(params)) == Some(key.clone());
		if still_current {
			match &outcome {
				Ok(response) => {
					state.result = Some((key, response.clone()));
					state.error = None;
				}
				Err(e) => {
					state.error = Some((key, e.clone()));
					state.result = None;
				}
			}
		} else {
			debug!(key = ?key, "discarding outcome for superseded key");
		}

		Some(outcome)
	}

	/// Forgets the params, the shown outcome and the cached entry. Does not
	/// refetch.
	pub async fn reset(&self) {
		let mut state = self.inner.state.lock().await;
		if let Some(params) = state.params.take() {
			let key = self.key_for(&params);
			self.inner.cache.invalidate(&key).await;
		}
		state.result = None;
		state.error = None;
		state.loading = None;
	}

	/// Forgets everything, cached entries for every key included. Used when
	/// the session ends so nothing fetched under it is served again.
	pub async fn clear(&self) {
		let mut state = self.inner.state.lock().await;
		*state = RitualState::default();
		self.inner.cache.clear().await;
		debug!("ritual query cleared");
	}

	/// Result, error and loading flag for the current key only.
	pub async fn snapshot(&self) -> RitualSnapshot {
		let state = self.inner.state.lock().await;
		let key = state.params.as_ref().map(|params| self.key_for(params));
		let current = |tagged: &RitualKey| key.as_ref() == Some(tagged);

		RitualSnapshot {
			params: state.params.clone(),
			result: state
				.result
				.as_ref()
				.filter(|(k, _)| current(k))
				.map(|(_, r)| r.clone()),
			error: state
				.error
				.as_ref()
				.filter(|(k, _)| current(k))
				.map(|(_, e)| e.clone()),
			loading: state.loading.as_ref().is_some_and(|k| current(k)),
		}
	}
}
