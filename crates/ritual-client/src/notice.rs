// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transient user notifications.

use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
	Success,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub level: NoticeLevel,
	pub message: String,
}

/// Fan-out of notices to whoever is listening. Publishing with no
/// subscribers is fine; the notice is simply dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
	tx: broadcast::Sender<Notice>,
}

impl Notifier {
	pub fn new(capacity: usize) -> Self {
		let (tx, _) = broadcast::channel(capacity.max(1));
		Self { tx }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
		self.tx.subscribe()
	}

	pub fn success(&self, message: impl Into<String>) {
		self.publish(NoticeLevel::Success, message.into());
	}

	pub fn error(&self, message: impl Into<String>) {
		self.publish(NoticeLevel::Error, message.into());
	}

	fn publish(&self, level: NoticeLevel, message: String) {
		debug!(level = ?level, message = %message, "notice");
		let _ = self.tx.send(Notice { level, message });
	}
}

impl Default for Notifier {
	fn default() -> Self {
		Self::new(32)
	}
}
