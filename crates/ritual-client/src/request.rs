// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request layer shared by every backend call.
//!
//! Each request carries `Content-Type: application/json`, an
//! `Accept-Language` header derived from the active locale and, unless
//! suppressed, a bearer token re-read from durable storage at call time.
//! Responses are normalized into [`ApiError`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use ritual_client_config::ClientConfig;
use ritual_client_storage::{keys, load_string, DurableStore};
use ritual_common_i18n::{api_locale, DEFAULT_LOCALE};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::state::{cell, CellReader};

/// Which bearer token a request carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenSource {
	/// Read the persisted token at send time.
	#[default]
	Storage,
	/// Use this token regardless of what is persisted.
	Explicit(String),
	/// Send no `Authorization` header.
	Anonymous,
}

/// Reacts to a 401 on any request not sent with [`TokenSource::Anonymous`].
///
/// Installed once when the client is built; the only path by which an
/// expired token clears itself without an explicit logout.
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
	async fn on_unauthorized(&self);
}

/// Handler that leaves everything as it is.
#[derive(Debug, Default)]
pub struct IgnoreUnauthorized;

#[async_trait]
impl UnauthorizedHandler for IgnoreUnauthorized {
	async fn on_unauthorized(&self) {}
}

/// Backend error body: `{ "error": "<message>" }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
	error: Option<Value>,
}

/// Builder for constructing an [`ApiClient`].
pub struct ApiClientBuilder {
	base_url: Option<String>,
	request_timeout: Duration,
	store: Option<Arc<dyn DurableStore>>,
	token_key: &'static str,
	locale: Option<CellReader<String>>,
	default_locale: String,
	on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClientBuilder {
	pub fn new() -> Self {
		Self {
			base_url: None,
			request_timeout: Duration::from_secs(30),
			store: None,
			token_key: keys::AUTH_TOKEN,
			locale: None,
			default_locale: DEFAULT_LOCALE.to_string(),
			on_unauthorized: None,
		}
	}

	/// Takes base URL, timeout and default locale from configuration.
	pub fn config(mut self, config: &ClientConfig) -> Self {
		self.base_url = Some(config.base_url.clone());
		self.request_timeout = config.request_timeout;
		self.default_locale = config.default_locale.clone();
		self
	}

	/// Sets the backend origin, e.g. `http://localhost:5001`.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// Durable storage the token is read through.
	pub fn store(mut self, store: Arc<dyn DurableStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Storage key holding the bearer token.
	pub fn token_key(mut self, key: &'static str) -> Self {
		self.token_key = key;
		self
	}

	/// Active locale cell; its value becomes `Accept-Language`.
	pub fn locale(mut self, locale: CellReader<String>) -> Self {
		self.locale = Some(locale);
		self
	}

	pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
		self.default_locale = locale.into();
		self
	}

	pub fn unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
		self.on_unauthorized = Some(handler);
		self
	}

	pub fn build(self) -> Result<ApiClient> {
		let base_url = self.base_url.ok_or(ApiError::InvalidBaseUrl)?;
		let base_url = base_url.trim_end_matches('/').to_string();
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(ApiError::InvalidBaseUrl);
		}

		let http = ritual_common_http::builder(self.request_timeout)
			.build()
			.map_err(|e| ApiError::ClientBuild(e.to_string()))?;

		let store = self.store.unwrap_or_else(|| {
			Arc::new(ritual_client_storage::MemoryStore::new()) as Arc<dyn DurableStore>
		});
		let locale = self
			.locale
			.unwrap_or_else(|| cell(self.default_locale.clone()).1);
		let on_unauthorized = self
			.on_unauthorized
			.unwrap_or_else(|| Arc::new(IgnoreUnauthorized) as Arc<dyn UnauthorizedHandler>);

		Ok(ApiClient {
			inner: Arc::new(ApiClientInner {
				base_url,
				http,
				store,
				token_key: self.token_key,
				locale,
				default_locale: self.default_locale,
				on_unauthorized,
			}),
		})
	}
}

impl Default for ApiClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ApiClientInner {
	base_url: String,
	http: Client,
	store: Arc<dyn DurableStore>,
	token_key: &'static str,
	locale: CellReader<String>,
	default_locale: String,
	on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

/// HTTP client for the ritual backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
	inner: Arc<ApiClientInner>,
}

impl fmt::Debug for ApiClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiClient")
			.field("base_url", &self.inner.base_url)
			.field("token_key", &self.inner.token_key)
			.finish()
	}
}

impl ApiClient {
	pub fn builder() -> ApiClientBuilder {
		ApiClientBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	/// Current `Accept-Language` value.
	pub fn api_locale(&self) -> String {
		self.inner
			.locale
			.with(|locale| api_locale(locale, &self.inner.default_locale))
	}

	pub fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
		RequestBuilder {
			client: self,
			method,
			path: path.into(),
			query: Vec::new(),
			body: Ok(None),
			token: TokenSource::Storage,
		}
	}

	pub fn get(&self, path: impl Into<String>) -> RequestBuilder<'_> {
		self.request(Method::GET, path)
	}

	pub fn post(&self, path: impl Into<String>) -> RequestBuilder<'_> {
		self.request(Method::POST, path)
	}

	pub fn put(&self, path: impl Into<String>) -> RequestBuilder<'_> {
		self.request(Method::PUT, path)
	}

	pub fn delete(&self, path: impl Into<String>) -> RequestBuilder<'_> {
		self.request(Method::DELETE, path)
	}

	async fn resolve_token(&self, source: TokenSource) -> Option<String> {
		match source {
			TokenSource::Storage => load_string(self.inner.store.as_ref(), self.inner.token_key).await,
			TokenSource::Explicit(token) => Some(token),
			TokenSource::Anonymous => None,
		}
	}
}

/// A request under construction. Nothing is sent until [`send`](Self::send).
#[must_use = "requests do nothing until sent"]
pub struct RequestBuilder<'a> {
	client: &'a ApiClient,
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	body: std::result::Result<Option<Value>, String>,
	token: TokenSource,
}

impl<'a> RequestBuilder<'a> {
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));
		self
	}

	/// Adds the parameter only when `value` is present.
	pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
		self.body = serde_json::to_value(body)
			.map(Some)
			.map_err(|e| e.to_string());
		self
	}

	/// Overrides where the bearer token comes from.
	pub fn token(mut self, source: TokenSource) -> Self {
		self.token = source;
		self
	}

	/// Sends no `Authorization` header.
	pub fn anonymous(self) -> Self {
		self.token(TokenSource::Anonymous)
	}

	/// Sends the request and decodes a successful body into `T`.
	pub async fn send<T: DeserializeOwned>(self) -> Result<T> {
		let client = self.client;
		let inner = &client.inner;
		let body = self.body.map_err(ApiError::Encode)?;

		let url = format!("{}{}", inner.base_url, self.path);
		let locale = client.api_locale();
		let anonymous = self.token == TokenSource::Anonymous;
		let token = client.resolve_token(self.token).await;
		let authenticated = token.is_some();

		let mut request = inner
			.http
			.request(self.method.clone(), &url)
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT_LANGUAGE, &locale);
		if !self.query.is_empty() {
			request = request.query(&self.query);
		}
		if let Some(token) = &token {
			request = request.bearer_auth(token);
		}
		if let Some(body) = &body {
			request = request.json(body);
		}

		debug!(
			method = %self.method,
			url = %url,
			locale = %locale,
			authenticated,
			"sending request"
		);

		let response = request.send().await.map_err(|e| {
			warn!(method = %self.method, url = %url, error = %e, "request failed to send");
			ApiError::Transport(e.to_string())
		})?;

		let status = response.status();
		let text = response
			.text()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;

		debug!(method = %self.method, url = %url, status = status.as_u16(), "received response");

		if status == StatusCode::UNAUTHORIZED && !anonymous {
			inner.on_unauthorized.on_unauthorized().await;
		}

		decode_response(status, &text)
	}

	/// Sends the request, ignoring whatever a successful response carries.
	pub async fn send_empty(self) -> Result<()> {
		self.send::<IgnoredAny>().await.map(|_| ())
	}
}

/// Maps status and body text onto a value or a normalized error.
///
/// An empty success body reads as `{}`. An empty error body counts as
/// undecodable.
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T> {
	let parsed: Option<Value> = if text.trim().is_empty() {
		status
			.is_success()
			.then(|| Value::Object(Default::default()))
	} else {
		match serde_json::from_str(text) {
			Ok(value) => Some(value),
			Err(e) if status.is_success() => return Err(ApiError::InvalidResponse(e.to_string())),
			Err(_) => None,
		}
	};

	let Some(value) = parsed else {
		if status == StatusCode::FORBIDDEN {
			return Err(ApiError::Forbidden);
		}
		return Err(ApiError::RequestFailed {
			status: status.as_u16(),
		});
	};

	if !status.is_success() {
		let message = serde_json::from_value::<ErrorBody>(value)
			.ok()
			.and_then(|body| body.error)
			.and_then(|error| match error {
				Value::String(message) => Some(message),
				_ => None,
			});
		return Err(match message {
			Some(message) => ApiError::Backend {
				status: status.as_u16(),
				message,
			},
			None => ApiError::RequestFailed {
				status: status.as_u16(),
			},
		});
	}

	serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
