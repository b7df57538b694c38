// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client core for the ritual calculator.
//!
//! This crate provides:
//! - **Request layer** ([`ApiClient`]): locale and bearer-token injection,
//!   read-through token storage, normalized [`ApiError`]s and a single
//!   [`UnauthorizedHandler`]
//! - **Session** ([`SessionManager`]): login, register, logout and the
//!   one-shot bootstrap that gates rendering
//! - **Locale** ([`LocaleController`]): persisted selection, backend string
//!   loading and translation with fallback
//! - **Cached queries** ([`QueryCache`], [`RitualQuery`]): key-tuple
//!   de-duplication with last-key-wins application of results
//! - **Theme**, **notices** and route gating
//!
//! [`RitualApp`] wires all of it together as one explicit context handle.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ritual_client::{Credentials, RitualApp, RitualParams};
//! use ritual_client_config::ClientConfig;
//! use ritual_client_storage::FileStore;
//!
//! # async fn example() -> Result<(), ritual_client::ApiError> {
//! let config = ClientConfig::default();
//! let store = Arc::new(FileStore::new(&config.storage_path));
//! let app = RitualApp::new(&config, store).await?;
//! app.start().await;
//!
//! app.login(&Credentials::new("ada", "secret")).await;
//! let snapshot = app
//!     .calculate(RitualParams::new("2024-01-01", Some("Fido".to_string())))
//!     .await;
//! println!("{:?}", snapshot.result);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod auth;
pub mod error;
pub mod guard;
pub mod locale;
pub mod navigation;
pub mod notice;
pub mod query;
pub mod request;
pub mod ritual;
pub mod session;
pub mod state;
pub mod theme;

pub use app::RitualApp;
pub use auth::{Credentials, User};
pub use error::{ApiError, Result};
pub use guard::RouteDecision;
pub use locale::LocaleController;
pub use navigation::{routes, Location, Navigator};
pub use notice::{Notice, NoticeLevel, Notifier};
pub use query::QueryCache;
pub use request::{ApiClient, ApiClientBuilder, IgnoreUnauthorized, TokenSource, UnauthorizedHandler};
pub use ritual::{
	BurningDateItem, CalculateRequest, CalculateResponse, RitualKey, RitualParams, RitualQuery,
	RitualSnapshot,
};
pub use session::{BootstrapPhase, ExpireSessionOnUnauthorized, Session, SessionManager};
pub use state::{cell, CellReader, CellWriter};
pub use theme::ThemeController;
