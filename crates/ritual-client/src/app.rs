// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application handle wiring the client components together.

use std::sync::Arc;

use ritual_client_config::ClientConfig;
use ritual_client_storage::DurableStore;
use tracing::instrument;

use crate::auth::{Credentials, User};
use crate::error::{ApiError, Result};
use crate::guard::{self, RouteDecision};
use crate::locale::LocaleController;
use crate::navigation::{routes, Navigator};
use crate::notice::Notifier;
use crate::query::QueryCache;
use crate::request::ApiClient;
use crate::ritual::{RitualParams, RitualQuery, RitualSnapshot};
use crate::session::{ExpireSessionOnUnauthorized, SessionManager};
use crate::theme::ThemeController;

/// Explicit context handle for the public client.
///
/// Each state cell has exactly one owner here: the session manager owns the
/// session and the auth token key, the locale controller owns the locale,
/// the theme controller owns the theme.
#[derive(Debug)]
pub struct RitualApp {
	api: ApiClient,
	navigator: Navigator,
	session: SessionManager,
	locale: LocaleController,
	theme: ThemeController,
	ritual: RitualQuery,
	notices: Notifier,
}

impl RitualApp {
	/// Restores locale and theme from `store` and builds the request layer.
	///
	/// Nothing touches the network until [`start`](Self::start).
	pub async fn new(config: &ClientConfig, store: Arc<dyn DurableStore>) -> Result<Self> {
		let navigator = Navigator::default();
		let session = SessionManager::new(Arc::clone(&store));
		let locale = LocaleController::restore(Arc::clone(&store), config.locale_registry()).await;
		let theme = ThemeController::restore(
			Arc::clone(&store),
			config.themes.clone(),
			config.default_theme.clone(),
		)
		.await;

		let ritual = RitualQuery::new(
			QueryCache::new(config.dedupe_interval),
			locale.subscribe(),
			config.default_locale.clone(),
		);

		let api = ApiClient::builder()
			.config(config)
			.store(Arc::clone(&store))
			.locale(locale.subscribe())
			.unauthorized_handler(Arc::new(
				ExpireSessionOnUnauthorized::new(session.clone(), navigator.clone())
					.with_ritual(ritual.clone()),
			))
			.build()?;

		Ok(Self {
			api,
			navigator,
			session,
			locale,
			theme,
			ritual,
			notices: Notifier::default(),
		})
	}

	/// Loads strings for the restored locale and runs the session bootstrap.
	#[instrument(skip_all)]
	pub async fn start(&self) {
		tokio::join!(
			self.locale.load_initial(&self.api),
			self.session.bootstrap(&self.api)
		);
	}

	pub fn api(&self) -> &ApiClient {
		&self.api
	}

	pub fn navigator(&self) -> &Navigator {
		&self.navigator
	}

	pub fn session(&self) -> &SessionManager {
		&self.session
	}

	pub fn locale(&self) -> &LocaleController {
		&self.locale
	}

	pub fn theme(&self) -> &ThemeController {
		&self.theme
	}

	pub fn ritual(&self) -> &RitualQuery {
		&self.ritual
	}

	pub fn notices(&self) -> &Notifier {
		&self.notices
	}

	/// Gate for a protected route at `path`.
	pub fn route(&self, path: &str) -> RouteDecision {
		guard::protected(&self.session.current(), path)
	}

	pub fn login_route(&self) -> RouteDecision {
		guard::guest_only(&self.session.current())
	}

	pub async fn login(&self, credentials: &Credentials) -> Option<User> {
		let outcome = self.session.login(&self.api, credentials).await;
		self.finish_auth(outcome, "auth.loginSuccess").await
	}

	pub async fn register(&self, credentials: &Credentials) -> Option<User> {
		let outcome = self.session.register(&self.api, credentials).await;
		self.finish_auth(outcome, "auth.registerSuccess").await
	}

	async fn finish_auth(&self, outcome: Result<User>, success_key: &str) -> Option<User> {
		match outcome {
			Ok(user) => {
				self.notices.success(self.locale.translate(success_key).await);
				let to = self
					.navigator
					.current()
					.from
					.unwrap_or_else(|| routes::HOME.to_string());
				self.navigator.navigate(to);
				Some(user)
			}
			Err(e) => {
				self.notify_error(&e).await;
				None
			}
		}
	}

	/// Clears the session and any cached calculation, then goes to login.
	pub async fn logout(&self) {
		self.session.logout().await;
		self.ritual.clear().await;
		self.navigator.navigate(routes::LOGIN);
	}

	/// Switches locale and refetches the shown calculation for the new key.
	///
	/// The old-language result is cleared before the new request starts.
	pub async fn set_locale(&self, code: &str) -> bool {
		if !self.locale.set_locale(&self.api, code).await {
			return false;
		}
		if self.ritual.sync_locale().await {
			self.ritual.refresh(&self.api).await;
		}
		true
	}

	/// Submits a calculation and waits for its outcome.
	pub async fn calculate(&self, params: RitualParams) -> RitualSnapshot {
		self.ritual.trigger(params).await;
		self.ritual.refresh(&self.api).await;
		self.ritual.snapshot().await
	}

	/// User-facing text for a failure.
	pub async fn describe_error(&self, error: &ApiError) -> String {
		self.locale.describe_error(error).await
	}

	pub async fn notify_error(&self, error: &ApiError) {
		self.notices.error(self.describe_error(error).await);
	}
}
