// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the admin client.

use ritual_client::ApiError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
	/// The backend call failed.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// A form value was rejected before anything was sent.
	#[error("{field}: {message}")]
	Validation { field: &'static str, message: String },
}

impl AdminError {
	pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
		Self::Validation {
			field,
			message: message.into(),
		}
	}

	pub fn api(&self) -> Option<&ApiError> {
		match self {
			AdminError::Api(e) => Some(e),
			AdminError::Validation { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_api_error_message_passes_through() {
		let err = AdminError::from(ApiError::Backend {
			status: 409,
			message: "key already exists".to_string(),
		});
		assert_eq!(err.to_string(), "key already exists");
		assert!(err.api().is_some());
	}

	#[test]
	fn test_validation_message() {
		let err = AdminError::validation("title", "must not be empty");
		assert_eq!(err.to_string(), "title: must not be empty");
		assert!(err.api().is_none());
	}
}
