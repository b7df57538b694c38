// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Terminal output helpers.

use ritual_client::{Notice, NoticeLevel};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Prints every notice published since `rx` subscribed. Errors go to stderr.
pub fn drain_notices(rx: &mut broadcast::Receiver<Notice>) {
	loop {
		match rx.try_recv() {
			Ok(notice) => print_notice(&notice),
			Err(TryRecvError::Lagged(_)) => continue,
			Err(TryRecvError::Empty | TryRecvError::Closed) => break,
		}
	}
}

fn print_notice(notice: &Notice) {
	match notice.level {
		NoticeLevel::Success => println!("{}", notice.message),
		NoticeLevel::Error => eprintln!("error: {}", notice.message),
	}
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_string();
	}
	let kept: String = text.chars().take(max.saturating_sub(3)).collect();
	format!("{kept}...")
}

pub fn or_dash(value: Option<&str>) -> &str {
	match value {
		Some(v) if !v.is_empty() => v,
		_ => "-",
	}
}
