// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication endpoints and wire types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::request::{ApiClient, TokenSource};

/// Authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Backend ids are numeric on some endpoints and strings on others.
	#[serde(deserialize_with = "id_as_string")]
	pub id: String,
	pub username: String,
}

/// Accepts a numeric or string id and yields it as a string.
pub fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Number(i64),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(id) => id,
		RawId::Number(id) => id.to_string(),
	})
}

/// Username and password as submitted by the login and register forms.
#[derive(Clone, Serialize)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

impl Credentials {
	/// Surrounding whitespace is stripped from the username only.
	pub fn new(username: impl AsRef<str>, password: impl Into<String>) -> Self {
		Self {
			username: username.as_ref().trim().to_string(),
			password: password.into(),
		}
	}
}

impl std::fmt::Debug for Credentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"[REDACTED]")
			.finish()
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
	pub token: String,
	pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
	pub user: User,
}

/// `POST /api/auth/login`
pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<AuthResponse> {
	api.post("/api/auth/login")
		.anonymous()
		.json(credentials)
		.send()
		.await
}

/// `POST /api/auth/register`
pub async fn register(api: &ApiClient, credentials: &Credentials) -> Result<AuthResponse> {
	api.post("/api/auth/register")
		.anonymous()
		.json(credentials)
		.send()
		.await
}

/// `GET /api/auth/me` with the given token.
pub async fn me(api: &ApiClient, token: &str) -> Result<MeResponse> {
	api.get("/api/auth/me")
		.token(TokenSource::Explicit(token.to_string()))
		.send()
		.await
}
