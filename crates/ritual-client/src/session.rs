// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session state and its bootstrap.
//!
//! [`SessionManager`] is the only writer of the session cell and of the
//! persisted auth token. The bootstrap runs at most once per manager:
//!
//! ```text
//! Uninitialized ──no token──────────────────────────► Ready
//!       │
//!       └─token─► Validating ──/api/auth/me ok──────► Ready (user set)
//!                     └───────any failure───────────► Ready (token, user, storage cleared)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use ritual_client_storage::{keys, load_string, remove_keys, DurableStore};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use crate::auth::{self, AuthResponse, Credentials, User};
use crate::error::Result;
use crate::navigation::{routes, Navigator};
use crate::request::{ApiClient, UnauthorizedHandler};
use crate::ritual::RitualQuery;
use crate::state::{cell, CellReader, CellWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapPhase {
	#[default]
	Uninitialized,
	Validating,
	Ready,
}

/// The client's belief about who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
	pub token: Option<String>,
	/// Present only once `token` has been validated or just issued.
	pub user: Option<User>,
	pub phase: BootstrapPhase,
}

impl Session {
	/// True once the bootstrap has resolved; gates the whole route tree.
	pub fn ready(&self) -> bool {
		self.phase == BootstrapPhase::Ready
	}

	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}
}

struct SessionInner {
	cell: CellWriter<Session>,
	store: Arc<dyn DurableStore>,
	bootstrap: OnceCell<()>,
}

/// Owner of the session cell. Clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
	inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionManager")
			.field("session", &self.current())
			.finish()
	}
}

impl SessionManager {
	pub fn new(store: Arc<dyn DurableStore>) -> Self {
		let (cell, _) = cell(Session::default());
		Self {
			inner: Arc::new(SessionInner {
				cell,
				store,
				bootstrap: OnceCell::new(),
			}),
		}
	}

	pub fn subscribe(&self) -> CellReader<Session> {
		self.inner.cell.reader()
	}

	pub fn current(&self) -> Session {
		self.inner.cell.get()
	}

	/// Restores and validates the persisted token.
	///
	/// Only the first call does any work; concurrent and later callers wait
	/// for that one attempt. Returns once the session is ready.
	#[instrument(skip_all)]
	pub async fn bootstrap(&self, api: &ApiClient) {
		self.inner
			.bootstrap
			.get_or_init(|| self.run_bootstrap(api))
			.await;
	}

	async fn run_bootstrap(&self, api: &ApiClient) {
		let Some(token) = load_string(self.inner.store.as_ref(), keys::AUTH_TOKEN).await else {
			info!("no persisted token, session ready");
			self.inner.cell.update(|session| {
				session.token = None;
				session.user = None;
				session.phase = BootstrapPhase::Ready;
			});
			return;
		};

		self.inner.cell.update(|session| {
			session.token = Some(token.clone());
			session.phase = BootstrapPhase::Validating;
		});

		match auth::me(api, &token).await {
			Ok(me) => {
				info!(user_id = %me.user.id, "restored session");
				self.inner.cell.update(|session| session.user = Some(me.user));
			}
			Err(e) => {
				warn!(error = %e.detail(), "persisted token rejected, clearing session");
				self.clear().await;
			}
		}

		self.inner
			.cell
			.update(|session| session.phase = BootstrapPhase::Ready);
	}

	#[instrument(skip_all, fields(username = %credentials.username))]
	pub async fn login(&self, api: &ApiClient, credentials: &Credentials) -> Result<User> {
		let response = auth::login(api, credentials).await?;
		Ok(self.establish(response).await)
	}

	#[instrument(skip_all, fields(username = %credentials.username))]
	pub async fn register(&self, api: &ApiClient, credentials: &Credentials) -> Result<User> {
		let response = auth::register(api, credentials).await?;
		Ok(self.establish(response).await)
	}

	async fn establish(&self, response: AuthResponse) -> User {
		if let Err(e) = self
			.inner
			.store
			.set(keys::AUTH_TOKEN, &response.token)
			.await
		{
			warn!(error = %e, "failed to persist auth token");
		}
		let user = response.user;
		info!(user_id = %user.id, "session established");
		self.inner.cell.update(|session| {
			session.token = Some(response.token);
			session.user = Some(user.clone());
		});
		user
	}

	pub async fn logout(&self) {
		self.clear().await;
		info!("logged out");
	}

	/// Drops a token the backend no longer accepts.
	pub async fn expire(&self) {
		self.clear().await;
		info!("session expired");
	}

	async fn clear(&self) {
		// Failures are already logged per key.
		let _ = remove_keys(self.inner.store.as_ref(), &[keys::AUTH_TOKEN]).await;
		self.inner.cell.update(|session| {
			session.token = None;
			session.user = None;
		});
	}
}

/// Reacts to a 401 by expiring the session and returning to the login route.
#[derive(Debug, Clone)]
pub struct ExpireSessionOnUnauthorized {
	session: SessionManager,
	navigator: Navigator,
	ritual: Option<RitualQuery>,
}

impl ExpireSessionOnUnauthorized {
	pub fn new(session: SessionManager, navigator: Navigator) -> Self {
		Self {
			session,
			navigator,
			ritual: None,
		}
	}

	/// Also clears `ritual` when the session expires.
	pub fn with_ritual(mut self, ritual: RitualQuery) -> Self {
		self.ritual = Some(ritual);
		self
	}
}

#[async_trait]
impl UnauthorizedHandler for ExpireSessionOnUnauthorized {
	async fn on_unauthorized(&self) {
		self.session.expire().await;
		if let Some(ritual) = &self.ritual {
			ritual.clear().await;
		}
		let from = self.navigator.current().path;
		if from != routes::LOGIN {
			self.navigator.redirect(routes::LOGIN, Some(from));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ritual_client_storage::MemoryStore;

	fn offline_client(store: Arc<dyn DurableStore>) -> ApiClient {
		// Port 9 (discard) refuses connections, so any request fails fast.
		ApiClient::builder()
			.base_url("http://127.0.0.1:9")
			.store(store)
			.build()
			.unwrap()
	}

	#[tokio::test]
	async fn test_bootstrap_without_token_is_ready_immediately() {
		let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
		let session = SessionManager::new(store.clone());
		assert_eq!(session.current().phase, BootstrapPhase::Uninitialized);

		session.bootstrap(&offline_client(store)).await;

		let current = session.current();
		assert!(current.ready());
		assert!(current.token.is_none());
		assert!(current.user.is_none());
	}

	#[tokio::test]
	async fn test_bootstrap_treats_placeholder_token_as_absent() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, "undefined")]));
		let session = SessionManager::new(store.clone());
		session.bootstrap(&offline_client(store)).await;
		assert!(session.current().ready());
		assert!(!session.current().is_authenticated());
	}

	#[tokio::test]
	async fn test_bootstrap_failure_clears_everything() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, "stale")]));
		let session = SessionManager::new(store.clone());

		session.bootstrap(&offline_client(store.clone())).await;

		let current = session.current();
		assert!(current.ready());
		assert!(current.token.is_none());
		assert!(current.user.is_none());
		assert_eq!(store.get(keys::AUTH_TOKEN).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_logout_clears_storage_and_cell() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, "t")]));
		let session = SessionManager::new(store.clone());
		session
			.establish(AuthResponse {
				token: "t".to_string(),
				user: User {
					id: "1".to_string(),
					username: "ada".to_string(),
				},
			})
			.await;
		assert!(session.current().is_authenticated());

		session.logout().await;

		assert!(!session.current().is_authenticated());
		assert!(session.current().user.is_none());
		assert_eq!(store.get(keys::AUTH_TOKEN).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_unauthorized_handler_redirects_with_origin() {
		let store: Arc<dyn DurableStore> =
			Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, "t")]));
		let session = SessionManager::new(store.clone());
		let navigator = Navigator::new("/history");
		let handler = ExpireSessionOnUnauthorized::new(session.clone(), navigator.clone());

		handler.on_unauthorized().await;

		assert_eq!(navigator.current().path, routes::LOGIN);
		assert_eq!(navigator.current().from.as_deref(), Some("/history"));
		assert_eq!(store.get(keys::AUTH_TOKEN).await.unwrap(), None);
	}
}
