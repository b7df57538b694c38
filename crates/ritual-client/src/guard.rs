// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route gating on session state.

use crate::navigation::routes;
use crate::session::Session;

/// What a route should do given the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
	/// Bootstrap still running: show a neutral loading state, never the
	/// login screen or protected content.
	Loading,
	Redirect {
		to: &'static str,
		/// Where the user was headed, for login to send them back.
		from: Option<String>,
	},
	Render,
}

/// Gate for routes that require a token.
pub fn protected(session: &Session, path: &str) -> RouteDecision {
	if !session.ready() {
		return RouteDecision::Loading;
	}
	if !session.is_authenticated() {
		return RouteDecision::Redirect {
			to: routes::LOGIN,
			from: Some(path.to_string()),
		};
	}
	RouteDecision::Render
}

/// Gate for the login route: signed-in users go home.
pub fn guest_only(session: &Session) -> RouteDecision {
	if !session.ready() {
		return RouteDecision::Loading;
	}
	if session.is_authenticated() {
		return RouteDecision::Redirect {
			to: routes::HOME,
			from: None,
		};
	}
	RouteDecision::Render
}

/// Gate for admin screens, which need both a token and a user.
pub fn admin_protected(has_token: bool, has_user: bool) -> RouteDecision {
	if has_token && has_user {
		RouteDecision::Render
	} else {
		RouteDecision::Redirect {
			to: routes::ADMIN_LOGIN,
			from: None,
		}
	}
}
