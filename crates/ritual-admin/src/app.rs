// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin application handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use ritual_client::guard::admin_protected;
use ritual_client::{
	routes, ApiClient, Credentials, Navigator, Notifier, Result as ApiResult, RouteDecision,
};
use ritual_client_config::ClientConfig;
use ritual_client_storage::{keys, DurableStore};
use tracing::{instrument, warn};

use crate::api::{AdminApi, Saved};
use crate::error::AdminError;
use crate::mutation::{failure_text, Mutation, DELETE, SAVE, UPDATE};
use crate::queries::{AdminQueries, AdminQueryKey};
use crate::session::{AdminSession, ExpireAdminOnUnauthorized};
use crate::types::{
	AdminUser, Announcement, AnnouncementDraft, CalculateLogItem, LanguageString,
	LanguageStringDraft, Page, SettingItem, StatsResult, UserListItem,
};

const LOGIN_FAILED: &str = "登录失败";

#[derive(Debug)]
pub struct AdminApp {
	navigator: Navigator,
	session: AdminSession,
	queries: AdminQueries,
	mutation: Mutation,
	notices: Notifier,
}

impl AdminApp {
	/// Restores the operator session and builds a request layer that reads
	/// the admin token key.
	pub async fn new(config: &ClientConfig, store: Arc<dyn DurableStore>) -> ApiResult<Self> {
		let navigator = Navigator::new(routes::ADMIN_DASHBOARD);
		let session = AdminSession::restore(Arc::clone(&store)).await;

		let api = ApiClient::builder()
			.config(config)
			.store(store)
			.token_key(keys::ADMIN_TOKEN)
			.unauthorized_handler(Arc::new(ExpireAdminOnUnauthorized::new(
				session.clone(),
				navigator.clone(),
			)))
			.build()?;

		let notices = Notifier::default();
		Ok(Self {
			navigator,
			session,
			queries: AdminQueries::new(AdminApi::new(api), config.dedupe_interval),
			mutation: Mutation::new(notices.clone()),
			notices,
		})
	}

	pub fn api(&self) -> &AdminApi {
		self.queries.api()
	}

	pub fn session(&self) -> &AdminSession {
		&self.session
	}

	pub fn navigator(&self) -> &Navigator {
		&self.navigator
	}

	pub fn notices(&self) -> &Notifier {
		&self.notices
	}

	pub fn queries(&self) -> &AdminQueries {
		&self.queries
	}

	pub fn is_busy(&self) -> bool {
		self.mutation.is_busy()
	}

	/// Gate for every admin screen.
	pub fn route(&self) -> RouteDecision {
		let state = self.session.current();
		admin_protected(state.token.is_some(), state.user.is_some())
	}

	#[instrument(skip_all)]
	pub async fn login(&self, credentials: &Credentials) -> Option<AdminUser> {
		match self.session.login(self.api().client(), credentials).await {
			Ok(user) => {
				self.navigator.navigate(routes::ADMIN_DASHBOARD);
				Some(user)
			}
			Err(e) => {
				warn!(error = %e, "admin login failed");
				self.notices.error(failure_text(&e, LOGIN_FAILED));
				None
			}
		}
	}

	pub async fn logout(&self) {
		self.session.logout().await;
		self.queries.clear().await;
		self.navigator.navigate(routes::ADMIN_LOGIN);
	}

	pub async fn users(&self, page: u32, search: &str) -> ApiResult<Page<UserListItem>> {
		self.reported(self.queries.users(page, search).await, "加载用户列表失败")
	}

	pub async fn stats(&self) -> ApiResult<StatsResult> {
		self.reported(self.queries.stats().await, "加载统计失败")
	}

	pub async fn calculate_logs(&self, page: u32) -> ApiResult<Page<CalculateLogItem>> {
		self.reported(self.queries.calculate_logs(page).await, "加载计算日志失败")
	}

	pub async fn settings(&self) -> ApiResult<BTreeMap<String, SettingItem>> {
		self.reported(self.queries.settings().await, "加载设置失败")
	}

	pub async fn announcements(&self) -> ApiResult<Vec<Announcement>> {
		self.reported(self.queries.announcements().await, "加载公告失败")
	}

	pub async fn language_strings(&self) -> ApiResult<Vec<LanguageString>> {
		self.reported(self.queries.language_strings().await, "加载语言字符串失败")
	}

	pub async fn upsert_setting(&self, key: &str, value: &str) -> Option<()> {
		let done = self
			.mutation
			.run(UPDATE, self.api().upsert_setting(key, value))
			.await;
		if done.is_some() {
			self.queries.invalidate(&AdminQueryKey::Settings).await;
		}
		done
	}

	pub async fn save_announcement(
		&self,
		editing: Option<i64>,
		draft: &AnnouncementDraft,
	) -> Option<Saved> {
		let saved = self
			.mutation
			.run(SAVE, self.api().save_announcement(editing, draft))
			.await;
		if saved.is_some() {
			self.queries.invalidate(&AdminQueryKey::Announcements).await;
		}
		saved
	}

	pub async fn delete_announcement(&self, id: i64) -> Option<()> {
		let done = self
			.mutation
			.run(DELETE, self.api().delete_announcement(id))
			.await;
		if done.is_some() {
			self.queries.invalidate(&AdminQueryKey::Announcements).await;
		}
		done
	}

	pub async fn save_language_string(
		&self,
		editing: Option<i64>,
		draft: &LanguageStringDraft,
	) -> Option<Saved> {
		let saved = self
			.mutation
			.run(SAVE, self.api().save_language_string(editing, draft))
			.await;
		if saved.is_some() {
			self.queries.invalidate(&AdminQueryKey::LanguageStrings).await;
		}
		saved
	}

	pub async fn delete_language_string(&self, id: i64) -> Option<()> {
		let done = self
			.mutation
			.run(DELETE, self.api().delete_language_string(id))
			.await;
		if done.is_some() {
			self.queries.invalidate(&AdminQueryKey::LanguageStrings).await;
		}
		done
	}

	fn reported<T>(&self, outcome: ApiResult<T>, what: &str) -> ApiResult<T> {
		if let Err(e) = &outcome {
			warn!(error = %e.detail(), "admin load failed");
			let message = failure_text(&AdminError::Api(e.clone()), what);
			self.notices.error(message);
		}
		outcome
	}
}
