// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin REST endpoints under `/api/admin`.

use std::collections::BTreeMap;

use ritual_client::{ApiClient, Result as ApiResult};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{AdminError, Result};
use crate::types::{
	Announcement, AnnouncementDraft, CalculateLogItem, Created, LanguageString,
	LanguageStringDraft, Page, SettingItem, StatsResult, UserListItem,
};

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
	pub page: u32,
	pub per_page: u32,
}

impl Pagination {
	pub fn page(page: u32) -> Self {
		Self {
			page: page.max(1),
			per_page: DEFAULT_PER_PAGE,
		}
	}
}

impl Default for Pagination {
	fn default() -> Self {
		Self::page(1)
	}
}

/// Which branch a save took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
	Created(i64),
	Updated(i64),
}

#[derive(Serialize)]
struct SettingBody<'a> {
	key: &'a str,
	value: &'a str,
}

/// Thin typed wrapper over the admin endpoints.
#[derive(Debug, Clone)]
pub struct AdminApi {
	api: ApiClient,
}

impl AdminApi {
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	pub fn client(&self) -> &ApiClient {
		&self.api
	}

	pub async fn users(
		&self,
		pagination: Pagination,
		search: Option<&str>,
	) -> ApiResult<Page<UserListItem>> {
		let search = search.map(str::trim).filter(|s| !s.is_empty());
		self.api
			.get("/api/admin/users")
			.query("page", pagination.page)
			.query("per_page", pagination.per_page)
			.query_opt("search", search)
			.send()
			.await
	}

	pub async fn stats(&self) -> ApiResult<StatsResult> {
		self.api.get("/api/admin/stats").send().await
	}

	pub async fn calculate_logs(
		&self,
		pagination: Pagination,
	) -> ApiResult<Page<CalculateLogItem>> {
		self.api
			.get("/api/admin/calculate-logs")
			.query("page", pagination.page)
			.query("per_page", pagination.per_page)
			.send()
			.await
	}

	pub async fn settings(&self) -> ApiResult<BTreeMap<String, SettingItem>> {
		self.api.get("/api/admin/settings").send().await
	}

	pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<()> {
		let key = key.trim();
		if key.is_empty() {
			return Err(AdminError::validation("key", "must not be empty"));
		}
		self.api
			.post("/api/admin/settings")
			.json(&SettingBody { key, value })
			.send_empty()
			.await?;
		Ok(())
	}

	pub async fn announcements(&self) -> ApiResult<Vec<Announcement>> {
		self.api.get("/api/admin/announcements").send().await
	}

	pub async fn create_announcement(&self, draft: &AnnouncementDraft) -> Result<Created> {
		draft.validate()?;
		Ok(self
			.api
			.post("/api/admin/announcements")
			.json(draft)
			.send()
			.await?)
	}

	pub async fn update_announcement(&self, id: i64, draft: &AnnouncementDraft) -> Result<()> {
		draft.validate()?;
		self.api
			.put(format!("/api/admin/announcements/{id}"))
			.json(draft)
			.send_empty()
			.await?;
		Ok(())
	}

	pub async fn delete_announcement(&self, id: i64) -> Result<()> {
		self.api
			.delete(format!("/api/admin/announcements/{id}"))
			.send_empty()
			.await?;
		Ok(())
	}

	/// Updates when `editing` names an existing announcement, creates
	/// otherwise. Never both.
	#[instrument(skip(self, draft))]
	pub async fn save_announcement(
		&self,
		editing: Option<i64>,
		draft: &AnnouncementDraft,
	) -> Result<Saved> {
		match editing {
			Some(id) => {
				debug!("updating announcement");
				self.update_announcement(id, draft).await?;
				Ok(Saved::Updated(id))
			}
			None => {
				debug!("creating announcement");
				let created = self.create_announcement(draft).await?;
				Ok(Saved::Created(created.id))
			}
		}
	}

	pub async fn language_strings(&self) -> ApiResult<Vec<LanguageString>> {
		self.api.get("/api/admin/language-strings").send().await
	}

	pub async fn create_language_string(&self, draft: &LanguageStringDraft) -> Result<()> {
		draft.validate()?;
		self.api
			.post("/api/admin/language-strings")
			.json(draft)
			.send_empty()
			.await?;
		Ok(())
	}

	pub async fn update_language_string(&self, id: i64, draft: &LanguageStringDraft) -> Result<()> {
		draft.validate()?;
		self.api
			.put(format!("/api/admin/language-strings/{id}"))
			.json(draft)
			.send_empty()
			.await?;
		Ok(())
	}

	pub async fn delete_language_string(&self, id: i64) -> Result<()> {
		self.api
			.delete(format!("/api/admin/language-strings/{id}"))
			.send_empty()
			.await?;
		Ok(())
	}

	/// Same single-branch rule as [`save_announcement`](Self::save_announcement).
	#[instrument(skip(self, draft))]
	pub async fn save_language_string(
		&self,
		editing: Option<i64>,
		draft: &LanguageStringDraft,
	) -> Result<Saved> {
		match editing {
			Some(id) => {
				self.update_language_string(id, draft).await?;
				Ok(Saved::Updated(id))
			}
			None => {
				self.create_language_string(draft).await?;
				// The create endpoint does not report the new id.
				Ok(Saved::Created(0))
			}
		}
	}
}
