// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage keys and their owners.
//!
//! Each key has exactly one writer: the session manager owns
//! [`AUTH_TOKEN`], the locale controller owns [`LOCALE`], the theme
//! controller owns [`THEME`] and the admin session owns [`ADMIN_TOKEN`] and
//! [`ADMIN_USER`].

pub const AUTH_TOKEN: &str = "pet-eternal-flame-token";
pub const LOCALE: &str = "pet-eternal-flame-lang";
pub const THEME: &str = "pet-eternal-flame-theme";

pub const ADMIN_TOKEN: &str = "admin_token";
pub const ADMIN_USER: &str = "admin_user";
