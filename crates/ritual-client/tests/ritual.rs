// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod common;

use std::time::Duration;

use common::{config_for, requests_to, store_with};
use ritual_client::{RitualApp, RitualParams};
use ritual_client_storage::keys;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn result_for(locale: &str) -> Value {
	json!({
		"petMonths": 14,
		"deathDate": "2024-01-01",
		"petName": "Fido",
		"suggestedQuantity": 3,
		"burningDates": [{ "date": "2024-01-07", "desc": format!("first-seventh-{locale}") }],
		"explanation": format!("explanation-{locale}")
	})
}

async fn mount_calculate(server: &MockServer, locale: &str, delay: Duration) {
	Mock::given(method("POST"))
		.and(path("/api/calculate"))
		.and(header("accept-language", locale))
		.and(body_partial_json(json!({ "deathDate": "2024-01-01", "petName": "Fido", "locale": locale })))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(result_for(locale))
				.set_delay(delay),
		)
		.mount(server)
		.await;
}

async fn mount_strings(server: &MockServer) {
	Mock::given(method("GET"))
		.and(path("/api/language-strings"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
		.mount(server)
		.await;
}

fn fido() -> RitualParams {
	RitualParams::new("2024-01-01", Some("Fido".to_string()))
}

#[tokio::test]
async fn locale_switch_hides_old_result_and_fires_one_request() {
	let server = MockServer::start().await;
	mount_strings(&server).await;
	mount_calculate(&server, "zh", Duration::ZERO).await;
	mount_calculate(&server, "en", Duration::from_millis(300)).await;

	let app = RitualApp::new(&config_for(&server), store_with(&[]))
		.await
		.unwrap();

	let snapshot = app.calculate(fido()).await;
	assert_eq!(
		snapshot.result.map(|r| r.explanation),
		Some("explanation-zh".to_string())
	);
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 1);

	let switch = app.set_locale("en");
	let observe = async {
		let mut locale = app.locale().subscribe();
		locale.wait_for(|code| code == "en").await;
		// Give the refresh a moment to start without letting it finish.
		tokio::time::sleep(Duration::from_millis(50)).await;
		app.ritual().snapshot().await
	};
	let (switched, pending) = tokio::join!(switch, observe);

	assert!(switched);
	assert!(pending.result.is_none());
	assert!(pending.error.is_none());
	assert!(pending.loading);

	let settled = app.ritual().snapshot().await;
	assert_eq!(
		settled.result.map(|r| r.explanation),
		Some("explanation-en".to_string())
	);
	assert!(!settled.loading);
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);
}

#[tokio::test]
async fn switching_back_reuses_cached_result() {
	let server = MockServer::start().await;
	mount_strings(&server).await;
	mount_calculate(&server, "zh", Duration::ZERO).await;
	mount_calculate(&server, "en", Duration::ZERO).await;

	let app = RitualApp::new(&config_for(&server), store_with(&[]))
		.await
		.unwrap();

	app.calculate(fido()).await;
	app.set_locale("en").await;
	app.set_locale("zh").await;

	let snapshot = app.ritual().snapshot().await;
	assert_eq!(
		snapshot.result.map(|r| r.explanation),
		Some("explanation-zh".to_string())
	);
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);
}

#[tokio::test]
async fn identical_submissions_share_one_request() {
	let server = MockServer::start().await;
	mount_calculate(&server, "zh", Duration::from_millis(100)).await;

	let app = RitualApp::new(&config_for(&server), store_with(&[]))
		.await
		.unwrap();

	app.ritual().trigger(fido()).await;
	let (a, b) = tokio::join!(app.ritual().refresh(app.api()), app.ritual().refresh(app.api()));
	assert_eq!(a.unwrap().unwrap(), b.unwrap().unwrap());

	app.calculate(fido()).await;
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 1);
}

#[tokio::test]
async fn reset_discards_cache_entry_without_refetching() {
	let server = MockServer::start().await;
	mount_calculate(&server, "zh", Duration::ZERO).await;

	let app = RitualApp::new(&config_for(&server), store_with(&[]))
		.await
		.unwrap();

	app.calculate(fido()).await;
	app.ritual().reset().await;
	let once = app.ritual().snapshot().await;
	app.ritual().reset().await;
	assert_eq!(app.ritual().snapshot().await, once);
	assert!(once.params.is_none() && once.result.is_none() && once.error.is_none());
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 1);

	app.calculate(fido()).await;
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);
}

#[tokio::test]
async fn backend_error_is_shown_for_current_key() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/calculate"))
		.respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "日期不能晚于今天" })))
		.mount(&server)
		.await;

	let app = RitualApp::new(&config_for(&server), store_with(&[]))
		.await
		.unwrap();

	let snapshot = app
		.calculate(RitualParams::new("2999-01-01", None))
		.await;
	assert!(snapshot.result.is_none());
	let error = snapshot.error.unwrap();
	assert_eq!(app.describe_error(&error).await, "日期不能晚于今天");

	let body: Value = serde_json::from_slice(&requests_to(&server, "/api/calculate").await[0].body).unwrap();
	assert_eq!(body, json!({ "deathDate": "2999-01-01", "locale": "zh" }));
}

#[tokio::test]
async fn logout_drops_results_cached_under_the_old_session() {
	let server = MockServer::start().await;
	mount_strings(&server).await;
	mount_calculate(&server, "zh", Duration::ZERO).await;
	mount_calculate(&server, "en", Duration::ZERO).await;

	let app = RitualApp::new(&config_for(&server), store_with(&[(keys::AUTH_TOKEN, "t1")]))
		.await
		.unwrap();

	app.calculate(fido()).await;
	app.set_locale("en").await;
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);

	app.logout().await;
	assert!(app.ritual().snapshot().await.params.is_none());

	app.set_locale("zh").await;
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);

	let snapshot = app.calculate(fido()).await;
	assert_eq!(
		snapshot.result.map(|r| r.explanation),
		Some("explanation-zh".to_string())
	);
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 3);
}

#[tokio::test]
async fn expired_session_drops_results_cached_under_it() {
	let server = MockServer::start().await;
	mount_strings(&server).await;
	mount_calculate(&server, "zh", Duration::ZERO).await;
	Mock::given(method("POST"))
		.and(path("/api/calculate"))
		.and(header("accept-language", "en"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
		.mount(&server)
		.await;

	let app = RitualApp::new(&config_for(&server), store_with(&[(keys::AUTH_TOKEN, "t1")]))
		.await
		.unwrap();

	app.calculate(fido()).await;
	app.set_locale("en").await;
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 2);
	assert_eq!(app.navigator().current().path, ritual_client::routes::LOGIN);

	app.set_locale("zh").await;
	let snapshot = app.calculate(fido()).await;
	assert_eq!(
		snapshot.result.map(|r| r.explanation),
		Some("explanation-zh".to_string())
	);
	assert_eq!(requests_to(&server, "/api/calculate").await.len(), 3);
}
