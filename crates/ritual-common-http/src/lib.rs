// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction shared by the public and admin clients, so both
//! identify themselves the same way and follow the same timeout policy.

mod client;

pub use client::{builder, user_agent, CONNECT_TIMEOUT};
