// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cached admin reads.
//!
//! Every list screen reads through one of these caches, and every mutation
//! invalidates the keys whose data it changed so the next read refetches.

use std::collections::BTreeMap;
use std::time::Duration;

use ritual_client::{QueryCache, Result};
use tracing::debug;

use crate::api::{AdminApi, Pagination};
use crate::types::{
	Announcement, CalculateLogItem, LanguageString, Page, SettingItem, StatsResult, UserListItem,
};

/// Identifies a cached admin read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AdminQueryKey {
	LanguageStrings,
	Users { page: u32, search: String },
	/// Every cached users page, whatever the search.
	AllUsers,
	Stats,
	CalculateLogs { page: u32 },
	/// Every cached log page.
	AllCalculateLogs,
	Settings,
	Announcements,
}

#[derive(Debug, Clone)]
pub struct AdminQueries {
	api: AdminApi,
	users: QueryCache<(u32, String), Page<UserListItem>>,
	stats: QueryCache<(), StatsResult>,
	logs: QueryCache<u32, Page<CalculateLogItem>>,
	settings: QueryCache<(), BTreeMap<String, SettingItem>>,
	announcements: QueryCache<(), Vec<Announcement>>,
	language_strings: QueryCache<(), Vec<LanguageString>>,
}

impl AdminQueries {
	pub fn new(api: AdminApi, dedupe_interval: Duration) -> Self {
		Self {
			api,
			users: QueryCache::new(dedupe_interval),
			stats: QueryCache::new(dedupe_interval),
			logs: QueryCache::new(dedupe_interval),
			settings: QueryCache::new(dedupe_interval),
			announcements: QueryCache::new(dedupe_interval),
			language_strings: QueryCache::new(dedupe_interval),
		}
	}

	pub fn api(&self) -> &AdminApi {
		&self.api
	}

	pub async fn users(&self, page: u32, search: &str) -> Result<Page<UserListItem>> {
		let pagination = Pagination::page(page);
		let search = search.trim().to_string();
		let api = self.api.clone();
		let term = search.clone();
		self.users
			.fetch((pagination.page, search), move || async move {
				api.users(pagination, Some(term.as_str())).await
			})
			.await
	}

	pub async fn stats(&self) -> Result<StatsResult> {
		let api = self.api.clone();
		self.stats
			.fetch((), move || async move { api.stats().await })
			.await
	}

	pub async fn calculate_logs(&self, page: u32) -> Result<Page<CalculateLogItem>> {
		let pagination = Pagination::page(page);
		let api = self.api.clone();
		self.logs
			.fetch(pagination.page, move || async move {
				api.calculate_logs(pagination).await
			})
			.await
	}

	pub async fn settings(&self) -> Result<BTreeMap<String, SettingItem>> {
		let api = self.api.clone();
		self.settings
			.fetch((), move || async move { api.settings().await })
			.await
	}

	pub async fn announcements(&self) -> Result<Vec<Announcement>> {
		let api = self.api.clone();
		self.announcements
			.fetch((), move || async move { api.announcements().await })
			.await
	}

	pub async fn language_strings(&self) -> Result<Vec<LanguageString>> {
		let api = self.api.clone();
		self.language_strings
			.fetch((), move || async move { api.language_strings().await })
			.await
	}

	pub async fn invalidate(&self, key: &AdminQueryKey) {
		debug!(key = ?key, "invalidating admin query");
		match key {
			AdminQueryKey::LanguageStrings => {
				self.language_strings.invalidate(&()).await;
			}
			AdminQueryKey::Users { page, search } => {
				self.users
					.invalidate(&((*page).max(1), search.trim().to_string()))
					.await;
			}
			AdminQueryKey::AllUsers => {
				self.users.clear().await;
			}
			AdminQueryKey::Stats => {
				self.stats.invalidate(&()).await;
			}
			AdminQueryKey::CalculateLogs { page } => {
				self.logs.invalidate(&(*page).max(1)).await;
			}
			AdminQueryKey::AllCalculateLogs => {
				self.logs.clear().await;
			}
			AdminQueryKey::Settings => {
				self.settings.invalidate(&()).await;
			}
			AdminQueryKey::Announcements => {
				self.announcements.invalidate(&()).await;
			}
		}
	}

	/// Drops everything, e.g. after the operator signs out.
	pub async fn clear(&self) {
		self.users.clear().await;
		self.stats.clear().await;
		self.logs.clear().await;
		self.settings.clear().await;
		self.announcements.clear().await;
		self.language_strings.clear().await;
	}
}
