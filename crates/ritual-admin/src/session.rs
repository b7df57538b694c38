// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator session: token and user persisted under separate keys.

use std::sync::Arc;

use async_trait::async_trait;
use ritual_client::{
	cell, routes, ApiClient, CellReader, CellWriter, Credentials, Navigator, UnauthorizedHandler,
};
use ritual_client_storage::{keys, load_json, load_string, remove_keys, save_json, DurableStore};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::types::{AdminLoginResponse, AdminUser};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminState {
	pub token: Option<String>,
	pub user: Option<AdminUser>,
}

impl AdminState {
	/// Signed in only when both halves are present.
	pub fn is_authenticated(&self) -> bool {
		self.token.is_some() && self.user.is_some()
	}
}

struct AdminSessionInner {
	cell: CellWriter<AdminState>,
	store: Arc<dyn DurableStore>,
}

#[derive(Clone)]
pub struct AdminSession {
	inner: Arc<AdminSessionInner>,
}

impl std::fmt::Debug for AdminSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminSession")
			.field("authenticated", &self.is_authenticated())
			.finish()
	}
}

impl AdminSession {
	/// Reads both keys. A user value that is not valid JSON is removed.
	pub async fn restore(store: Arc<dyn DurableStore>) -> Self {
		let token = load_string(store.as_ref(), keys::ADMIN_TOKEN).await;
		let user = load_json::<AdminUser>(store.as_ref(), keys::ADMIN_USER).await;
		let (cell, _) = cell(AdminState { token, user });
		Self {
			inner: Arc::new(AdminSessionInner { cell, store }),
		}
	}

	pub fn current(&self) -> AdminState {
		self.inner.cell.get()
	}

	pub fn subscribe(&self) -> CellReader<AdminState> {
		self.inner.cell.reader()
	}

	pub fn is_authenticated(&self) -> bool {
		self.inner.cell.get().is_authenticated()
	}

	/// `POST /api/admin/login`; persists token and user on success.
	#[instrument(skip_all, fields(username = %credentials.username))]
	pub async fn login(&self, api: &ApiClient, credentials: &Credentials) -> Result<AdminUser> {
		let response: AdminLoginResponse = api
			.post("/api/admin/login")
			.anonymous()
			.json(credentials)
			.send()
			.await?;

		let store = self.inner.store.as_ref();
		if let Err(e) = store.set(keys::ADMIN_TOKEN, &response.token).await {
			warn!(error = %e, "failed to persist admin token");
		}
		if let Err(e) = save_json(store, keys::ADMIN_USER, Some(&response.user)).await {
			warn!(error = %e, "failed to persist admin user");
		}

		info!(user_id = %response.user.id, "admin signed in");
		let user = response.user.clone();
		self.inner.cell.set(AdminState {
			token: Some(response.token),
			user: Some(response.user),
		});
		Ok(user)
	}

	pub async fn logout(&self) {
		self.clear().await;
		info!("admin signed out");
	}

	pub async fn expire(&self) {
		self.clear().await;
		info!("admin session expired");
	}

	async fn clear(&self) {
		// Failures are already logged per key.
		let _ = remove_keys(
			self.inner.store.as_ref(),
			&[keys::ADMIN_TOKEN, keys::ADMIN_USER],
		)
		.await;
		self.inner.cell.set(AdminState::default());
	}
}

/// Expires the admin session on 401 and returns to the admin login.
#[derive(Debug, Clone)]
pub struct ExpireAdminOnUnauthorized {
	session: AdminSession,
	navigator: Navigator,
}

impl ExpireAdminOnUnauthorized {
	pub fn new(session: AdminSession, navigator: Navigator) -> Self {
		Self { session, navigator }
	}
}

#[async_trait]
impl UnauthorizedHandler for ExpireAdminOnUnauthorized {
	async fn on_unauthorized(&self) {
		self.session.expire().await;
		self.navigator.navigate(routes::ADMIN_LOGIN);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ritual_client_storage::MemoryStore;

	#[tokio::test]
	async fn test_restore_requires_both_keys() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::ADMIN_TOKEN, "t")]));
		let session = AdminSession::restore(store).await;
		assert!(!session.is_authenticated());
		assert_eq!(session.current().token.as_deref(), Some("t"));
	}

	#[tokio::test]
	async fn test_restore_both_keys() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::with_entries([
			(keys::ADMIN_TOKEN, "t"),
			(keys::ADMIN_USER, r#"{"id":1,"username":"ops","role":"admin"}"#),
		]));
		let session = AdminSession::restore(store).await;
		assert!(session.is_authenticated());
		assert_eq!(
			session.current().user.and_then(|u| u.role).as_deref(),
			Some("admin")
		);
	}

	#[tokio::test]
	async fn test_corrupt_user_is_removed() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::with_entries([
			(keys::ADMIN_TOKEN, "t"),
			(keys::ADMIN_USER, "{not json"),
		]));
		let session = AdminSession::restore(store.clone()).await;
		assert!(!session.is_authenticated());
		assert_eq!(store.get(keys::ADMIN_USER).await.unwrap(), None);
		assert_eq!(
			store.get(keys::ADMIN_TOKEN).await.unwrap().as_deref(),
			Some("t")
		);
	}

	#[tokio::test]
	async fn test_placeholder_values_are_absent() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::with_entries([
			(keys::ADMIN_TOKEN, "null"),
			(keys::ADMIN_USER, "undefined"),
		]));
		let session = AdminSession::restore(store).await;
		assert_eq!(session.current(), AdminState::default());
	}

	#[tokio::test]
	async fn test_unauthorized_clears_both_keys_and_navigates() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::with_entries([
			(keys::ADMIN_TOKEN, "t"),
			(keys::ADMIN_USER, r#"{"id":"1","username":"ops"}"#),
		]));
		let session = AdminSession::restore(store.clone()).await;
		let navigator = Navigator::new(routes::ADMIN_DASHBOARD);

		ExpireAdminOnUnauthorized::new(session.clone(), navigator.clone())
			.on_unauthorized()
			.await;

		assert!(!session.is_authenticated());
		assert_eq!(navigator.current().path, routes::ADMIN_LOGIN);
		assert_eq!(store.get(keys::ADMIN_TOKEN).await.unwrap(), None);
		assert_eq!(store.get(keys::ADMIN_USER).await.unwrap(), None);
	}
}
