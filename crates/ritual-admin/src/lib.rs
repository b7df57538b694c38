// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator client for the ritual backend.
//!
//! Shares the request layer with the public client but keeps its own
//! session: the admin token and user are persisted under separate keys and
//! both must be present for any admin screen to render.

pub mod api;
pub mod app;
pub mod error;
pub mod mutation;
pub mod queries;
pub mod session;
pub mod types;

pub use api::{AdminApi, Pagination, Saved, DEFAULT_PER_PAGE};
pub use app::AdminApp;
pub use error::{AdminError, Result};
pub use mutation::{Mutation, MutationMessages};
pub use queries::{AdminQueries, AdminQueryKey};
pub use session::{AdminSession, AdminState, ExpireAdminOnUnauthorized};
pub use types::{
	AdminUser, Announcement, AnnouncementDraft, CalculateLogItem, Created, LanguageString,
	LanguageStringDraft, Page, SettingItem, StatsResult, UserListItem,
};
