// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::sync::Arc;

use ritual_client::ApiClient;
use ritual_client_config::ClientConfig;
use ritual_client_storage::{DurableStore, MemoryStore};
use wiremock::{MockServer, Request};

pub fn config_for(server: &MockServer) -> ClientConfig {
	let mut config = ClientConfig::default();
	config.base_url = server.uri();
	config
}

pub fn store_with(entries: &[(&str, &str)]) -> Arc<dyn DurableStore> {
	Arc::new(MemoryStore::with_entries(entries.iter().copied()))
}

pub fn api_for(server: &MockServer, store: Arc<dyn DurableStore>) -> ApiClient {
	ApiClient::builder()
		.base_url(server.uri())
		.store(store)
		.build()
		.unwrap()
}

pub async fn requests_to(server: &MockServer, path: &str) -> Vec<Request> {
	server
		.received_requests()
		.await
		.unwrap_or_default()
		.into_iter()
		.filter(|request| request.url.path() == path)
		.collect()
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
	request
		.headers
		.get(name)
		.and_then(|value| value.to_str().ok())
}
