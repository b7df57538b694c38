// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Upper bound on connection setup, independent of the request timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client builder with the ritual User-Agent, `timeout` for whole requests
/// and a connect timeout no longer than [`CONNECT_TIMEOUT`].
pub fn builder(timeout: Duration) -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.timeout(timeout)
		.connect_timeout(timeout.min(CONNECT_TIMEOUT))
}

/// `ritual/{version} ({os}; {arch})`
pub fn user_agent() -> String {
	format!(
		"ritual/{} ({}; {})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
