// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Submit helper for admin forms.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ritual_client::{ApiError, Notifier};
use tracing::{debug, warn};

use crate::error::{AdminError, Result};

/// Notice texts for one kind of mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationMessages {
	pub success: &'static str,
	pub failure: &'static str,
}

pub const SAVE: MutationMessages = MutationMessages {
	success: "保存成功",
	failure: "保存失败",
};

pub const DELETE: MutationMessages = MutationMessages {
	success: "删除成功",
	failure: "删除失败",
};

pub const UPDATE: MutationMessages = MutationMessages {
	success: "保存成功",
	failure: "操作失败",
};

/// Runs one mutation at a time and reports the outcome as a notice.
///
/// While a run is in progress further submits are rejected, the way a form
/// disables its submit button while saving.
#[derive(Debug, Clone)]
pub struct Mutation {
	busy: Arc<AtomicBool>,
	notices: Notifier,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

impl Mutation {
	pub fn new(notices: Notifier) -> Self {
		Self {
			busy: Arc::new(AtomicBool::new(false)),
			notices,
		}
	}

	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::Acquire)
	}

	/// Awaits `op` unless another run is in progress. Returns `None` when the
	/// submit was rejected or the operation failed.
	pub async fn run<T, Fut>(&self, messages: MutationMessages, op: Fut) -> Option<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		if self.busy.swap(true, Ordering::AcqRel) {
			debug!("mutation already in progress");
			return None;
		}
		let _guard = BusyGuard(&self.busy);

		match op.await {
			Ok(value) => {
				self.notices.success(messages.success);
				Some(value)
			}
			Err(e) => {
				warn!(error = %e, "admin mutation failed");
				self.notices.error(failure_text(&e, messages.failure));
				None
			}
		}
	}
}

/// Backend and validation messages are shown as-is; anything else gets the
/// generic failure text.
pub fn failure_text(error: &AdminError, fallback: &str) -> String {
	match error {
		AdminError::Api(ApiError::Backend { message, .. }) => message.clone(),
		AdminError::Validation { .. } => error.to_string(),
		AdminError::Api(_) => fallback.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ritual_client::NoticeLevel;
	use tokio::sync::oneshot;

	#[tokio::test]
	async fn test_success_publishes_notice() {
		let notices = Notifier::default();
		let mut rx = notices.subscribe();
		let mutation = Mutation::new(notices);

		let out = mutation.run(SAVE, async { Ok(7) }).await;

		assert_eq!(out, Some(7));
		let notice = rx.recv().await.unwrap();
		assert_eq!(notice.level, NoticeLevel::Success);
		assert_eq!(notice.message, "保存成功");
		assert!(!mutation.is_busy());
	}

	#[tokio::test]
	async fn test_failure_prefers_backend_message() {
		let notices = Notifier::default();
		let mut rx = notices.subscribe();
		let mutation = Mutation::new(notices);

		let out: Option<()> = mutation
			.run(DELETE, async {
				Err(AdminError::from(ApiError::Backend {
					status: 409,
					message: "in use".to_string(),
				}))
			})
			.await;
		assert_eq!(out, None);
		assert_eq!(rx.recv().await.unwrap().message, "in use");

		let _: Option<()> = mutation
			.run(DELETE, async {
				Err(AdminError::from(ApiError::RequestFailed { status: 500 }))
			})
			.await;
		let notice = rx.recv().await.unwrap();
		assert_eq!(notice.level, NoticeLevel::Error);
		assert_eq!(notice.message, "删除失败");
		assert!(!mutation.is_busy());
	}

	#[tokio::test]
	async fn test_second_submit_is_rejected_while_busy() {
		let mutation = Mutation::new(Notifier::default());
		let (release, wait) = oneshot::channel::<()>();

		let first = {
			let mutation = mutation.clone();
			tokio::spawn(async move {
				mutation
					.run(SAVE, async move {
						let _ = wait.await;
						Ok(1)
					})
					.await
			})
		};
		while !mutation.is_busy() {
			tokio::task::yield_now().await;
		}

		assert_eq!(mutation.run(SAVE, async { Ok(2) }).await, None);

		release.send(()).unwrap();
		assert_eq!(first.await.unwrap(), Some(1));
		assert!(!mutation.is_busy());
	}
}
