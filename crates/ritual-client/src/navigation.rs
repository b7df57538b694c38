// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side location and navigation.

use std::sync::Arc;

use tracing::debug;

use crate::state::{cell, CellReader, CellWriter};

pub mod routes {
	pub const HOME: &str = "/";
	pub const LOGIN: &str = "/login";
	pub const ADMIN_LOGIN: &str = "/login";
	pub const ADMIN_DASHBOARD: &str = "/dashboard";
}

/// Where the application currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub path: String,
	/// Route the user was bounced from, so login can send them back.
	pub from: Option<String>,
}

impl Location {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			from: None,
		}
	}
}

/// Owns the location cell. Clones share the same cell.
#[derive(Debug, Clone)]
pub struct Navigator {
	location: Arc<CellWriter<Location>>,
}

impl Navigator {
	pub fn new(initial: impl Into<String>) -> Self {
		let (writer, _) = cell(Location::new(initial));
		Self {
			location: Arc::new(writer),
		}
	}

	pub fn navigate(&self, path: impl Into<String>) {
		self.redirect(path, None);
	}

	/// Replaces the location, remembering where the redirect came from.
	pub fn redirect(&self, path: impl Into<String>, from: Option<String>) {
		let path = path.into();
		debug!(to = %path, from = ?from, "navigating");
		self.location.set(Location { path, from });
	}

	pub fn current(&self) -> Location {
		self.location.get()
	}

	pub fn subscribe(&self) -> CellReader<Location> {
		self.location.reader()
	}
}

impl Default for Navigator {
	fn default() -> Self {
		Self::new(routes::HOME)
	}
}
