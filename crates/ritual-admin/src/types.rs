// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin wire types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// Operator account, persisted as JSON under the admin user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
	#[serde(deserialize_with = "ritual_client::auth::id_as_string")]
	pub id: String,
	pub username: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginResponse {
	pub token: String,
	pub user: AdminUser,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListItem {
	pub id: i64,
	pub username: String,
	pub created_at: String,
}

impl UserListItem {
	pub fn created(&self) -> Option<DateTime<Utc>> {
		parse_timestamp(&self.created_at)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResult {
	pub total_users: u64,
	pub today_calculates: u64,
	pub total_calculates: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateLogItem {
	pub id: i64,
	pub user_id: Option<i64>,
	pub pet_name: Option<String>,
	pub death_date: String,
	pub locale: String,
	pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingItem {
	pub value: String,
	pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
	pub id: i64,
	pub title: String,
	pub body: String,
	pub locale: String,
	/// Stored as an integer flag by the backend.
	pub active: i64,
	pub start_at: Option<String>,
	pub end_at: Option<String>,
	pub created_at: String,
	pub updated_at: String,
}

impl Announcement {
	pub fn is_active(&self) -> bool {
		self.active != 0
	}

	/// Draft pre-filled from this announcement, for editing.
	pub fn to_draft(&self) -> AnnouncementDraft {
		AnnouncementDraft {
			title: self.title.clone(),
			body: self.body.clone(),
			locale: self.locale.clone(),
			active: self.is_active(),
			start_at: self.start_at.clone(),
			end_at: self.end_at.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementDraft {
	pub title: String,
	pub body: String,
	pub locale: String,
	pub active: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_at: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub end_at: Option<String>,
}

impl AnnouncementDraft {
	/// New active announcement in the default locale.
	pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
			locale: "zh".to_string(),
			active: true,
			start_at: None,
			end_at: None,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.title.trim().is_empty() {
			return Err(AdminError::validation("title", "must not be empty"));
		}
		if self.body.trim().is_empty() {
			return Err(AdminError::validation("body", "must not be empty"));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Created {
	pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageString {
	pub id: i64,
	pub key: String,
	pub zh: String,
	pub en: String,
	#[serde(default)]
	pub category: String,
	pub updated_at: String,
}

impl LanguageString {
	pub fn to_draft(&self) -> LanguageStringDraft {
		LanguageStringDraft {
			key: self.key.clone(),
			category: self.category.clone(),
			zh: self.zh.clone(),
			en: self.en.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStringDraft {
	pub key: String,
	pub category: String,
	pub zh: String,
	pub en: String,
}

impl LanguageStringDraft {
	pub fn validate(&self) -> Result<()> {
		if self.key.trim().is_empty() {
			return Err(AdminError::validation("key", "must not be empty"));
		}
		Ok(())
	}
}

/// Parses backend timestamps, which come either as RFC 3339 or as
/// SQL-style `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.ok()
		.or_else(|| {
			NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
				.ok()
				.map(|naive| naive.and_utc())
		})
}
