// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use ritual_admin::{AdminApp, AnnouncementDraft, LanguageStringDraft, Saved};
use ritual_client::{routes, Credentials, NoticeLevel, RouteDecision};
use ritual_client_config::ClientConfig;
use ritual_client_storage::{keys, DurableStore, MemoryStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
	let mut config = ClientConfig::default();
	config.base_url = server.uri();
	config
}

fn signed_in_store() -> Arc<dyn DurableStore> {
	Arc::new(MemoryStore::with_entries([
		(keys::ADMIN_TOKEN, "adm-tok"),
		(keys::ADMIN_USER, r#"{"id":1,"username":"ops","role":"admin"}"#),
	]))
}

async fn requests(server: &MockServer, verb: &str, route: &str) -> Vec<Request> {
	server
		.received_requests()
		.await
		.unwrap_or_default()
		.into_iter()
		.filter(|r| r.method.as_str() == verb && r.url.path() == route)
		.collect()
}

#[tokio::test]
async fn login_persists_token_and_user() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/admin/login"))
		.and(body_json(json!({ "username": "ops", "password": "pw" })))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"token": "adm-tok",
			"user": { "id": 1, "username": "ops", "role": "admin" }
		})))
		.mount(&server)
		.await;

	let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
	let app = AdminApp::new(&config_for(&server), store.clone())
		.await
		.unwrap();
	assert!(matches!(app.route(), RouteDecision::Redirect { .. }));

	let user = app.login(&Credentials::new(" ops ", "pw")).await.unwrap();

	assert_eq!(user.username, "ops");
	assert_eq!(app.route(), RouteDecision::Render);
	assert_eq!(app.navigator().current().path, routes::ADMIN_DASHBOARD);
	assert_eq!(
		store.get(keys::ADMIN_TOKEN).await.unwrap().as_deref(),
		Some("adm-tok")
	);
	let saved: serde_json::Value =
		serde_json::from_str(&store.get(keys::ADMIN_USER).await.unwrap().unwrap()).unwrap();
	assert_eq!(saved["username"], "ops");
}

#[tokio::test]
async fn failed_login_publishes_backend_message() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/admin/login"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "bad credentials" })))
		.mount(&server)
		.await;

	let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
	let app = AdminApp::new(&config_for(&server), store).await.unwrap();
	let mut notices = app.notices().subscribe();

	assert!(app.login(&Credentials::new("ops", "nope")).await.is_none());

	let notice = notices.recv().await.unwrap();
	assert_eq!(notice.level, NoticeLevel::Error);
	assert_eq!(notice.message, "bad credentials");
	assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn unauthorized_response_clears_admin_session() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/admin/stats"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
		.mount(&server)
		.await;

	let store = signed_in_store();
	let app = AdminApp::new(&config_for(&server), store.clone())
		.await
		.unwrap();
	assert_eq!(app.route(), RouteDecision::Render);

	let err = app.stats().await.unwrap_err();

	assert!(err.is_unauthorized());
	assert_eq!(app.navigator().current().path, routes::ADMIN_LOGIN);
	assert!(matches!(app.route(), RouteDecision::Redirect { .. }));
	assert_eq!(store.get(keys::ADMIN_TOKEN).await.unwrap(), None);
	assert_eq!(store.get(keys::ADMIN_USER).await.unwrap(), None);
}

#[tokio::test]
async fn admin_requests_carry_the_admin_token() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/admin/users"))
		.and(header("authorization", "Bearer adm-tok"))
		.and(query_param("page", "2"))
		.and(query_param("per_page", "20"))
		.and(query_param("search", "ada"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"items": [{ "id": 3, "username": "ada", "created_at": "2024-05-01 10:00:00" }],
			"total": 21
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = AdminApp::new(&config_for(&server), signed_in_store())
		.await
		.unwrap();

	let page = app.users(2, " ada ").await.unwrap();
	assert_eq!(page.total, 21);
	assert!(page.items[0].created().is_some());

	// Same key within the window is served from cache.
	app.users(2, "ada").await.unwrap();
}

#[tokio::test]
async fn save_announcement_takes_exactly_one_branch() {
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/api/admin/announcements/4"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/api/admin/announcements"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 9 })))
		.mount(&server)
		.await;

	let app = AdminApp::new(&config_for(&server), signed_in_store())
		.await
		.unwrap();
	let draft = AnnouncementDraft::new("Qingming", "Closed on the 4th");

	assert_eq!(
		app.save_announcement(Some(4), &draft).await,
		Some(Saved::Updated(4))
	);
	assert_eq!(
		requests(&server, "POST", "/api/admin/announcements")
			.await
			.len(),
		0
	);
	assert_eq!(
		requests(&server, "PUT", "/api/admin/announcements/4")
			.await
			.len(),
		1
	);

	assert_eq!(
		app.save_announcement(None, &draft).await,
		Some(Saved::Created(9))
	);
	assert_eq!(
		requests(&server, "POST", "/api/admin/announcements")
			.await
			.len(),
		1
	);
	assert_eq!(
		requests(&server, "PUT", "/api/admin/announcements/4")
			.await
			.len(),
		1
	);
}

#[tokio::test]
async fn mutation_invalidates_cached_list() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/admin/language-strings"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([{
			"id": 1,
			"key": "home.title",
			"zh": "首页",
			"en": "Home",
			"category": "home",
			"updated_at": "2024-05-01 10:00:00"
		}])))
		.mount(&server)
		.await;
	Mock::given(method("DELETE"))
		.and(path("/api/admin/language-strings/1"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
		.mount(&server)
		.await;

	let app = AdminApp::new(&config_for(&server), signed_in_store())
		.await
		.unwrap();
	let mut notices = app.notices().subscribe();

	app.language_strings().await.unwrap();
	app.language_strings().await.unwrap();
	assert_eq!(
		requests(&server, "GET", "/api/admin/language-strings")
			.await
			.len(),
		1
	);

	assert_eq!(app.delete_language_string(1).await, Some(()));
	assert_eq!(notices.recv().await.unwrap().message, "删除成功");

	app.language_strings().await.unwrap();
	assert_eq!(
		requests(&server, "GET", "/api/admin/language-strings")
			.await
			.len(),
		2
	);
}

#[tokio::test]
async fn invalid_draft_is_rejected_without_a_request() {
	let server = MockServer::start().await;
	let app = AdminApp::new(&config_for(&server), signed_in_store())
		.await
		.unwrap();
	let mut notices = app.notices().subscribe();

	let draft = LanguageStringDraft {
		key: "  ".to_string(),
		category: String::new(),
		zh: "值".to_string(),
		en: "value".to_string(),
	};
	assert_eq!(app.save_language_string(None, &draft).await, None);

	let notice = notices.recv().await.unwrap();
	assert_eq!(notice.level, NoticeLevel::Error);
	assert!(notice.message.starts_with("key"));
	assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn logout_clears_storage_and_returns_to_login() {
	let server = MockServer::start().await;
	let store = signed_in_store();
	let app = AdminApp::new(&config_for(&server), store.clone())
		.await
		.unwrap();

	app.logout().await;

	assert_eq!(app.navigator().current().path, routes::ADMIN_LOGIN);
	assert_eq!(store.get(keys::ADMIN_TOKEN).await.unwrap(), None);
	assert_eq!(store.get(keys::ADMIN_USER).await.unwrap(), None);
}
