// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the ritual request layer.

use ritual_common_i18n::is_message_key;
use thiserror::Error;

/// Result type alias for the ritual client.
pub type Result<T> = std::result::Result<T, ApiError>;

pub const FORBIDDEN_KEY: &str = "error.forbidden";
pub const REQUEST_FAILED_KEY: &str = "error.requestFailed";
pub const INVALID_RESPONSE_KEY: &str = "error.invalidResponse";

/// The single normalized failure value a request produces.
///
/// `Display` yields what the user should see: either a translatable
/// `error.*` key or the backend's own message, verbatim. Diagnostic detail
/// that must not reach the user is kept in the variant fields for logging.
///
/// The type is `Clone` so one outcome can be handed to every caller sharing
/// a de-duplicated request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
	/// 403 whose body could not be decoded.
	#[error("error.forbidden")]
	Forbidden,

	/// Non-2xx without a decodable backend message.
	#[error("error.requestFailed")]
	RequestFailed {
		/// HTTP status code.
		status: u16,
	},

	/// 2xx whose body did not decode into the expected shape.
	#[error("error.invalidResponse")]
	InvalidResponse(String),

	/// Backend-supplied `{ "error": "..." }` message.
	#[error("{message}")]
	Backend {
		/// HTTP status code.
		status: u16,
		/// Message as sent by the backend, usually already localized.
		message: String,
	},

	/// The request never produced a response.
	#[error("error.requestFailed")]
	Transport(String),

	/// The request body could not be encoded.
	#[error("error.requestFailed")]
	Encode(String),

	/// Base URL is missing or invalid.
	#[error("Invalid or missing base URL")]
	InvalidBaseUrl,

	/// The HTTP client could not be constructed.
	#[error("Failed to build HTTP client: {0}")]
	ClientBuild(String),
}

impl ApiError {
	/// HTTP status, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			ApiError::Forbidden => Some(403),
			ApiError::RequestFailed { status } | ApiError::Backend { status, .. } => Some(*status),
			_ => None,
		}
	}

	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}

	/// Text to show the user: a message key or the backend message.
	pub fn message(&self) -> String {
		self.to_string()
	}

	/// True when [`message`](Self::message) is a key to be run through the
	/// translation table rather than printed as-is.
	pub fn is_translatable(&self) -> bool {
		is_message_key(&self.message())
	}

	/// Detail for logs. Never shown to users.
	pub fn detail(&self) -> String {
		match self {
			ApiError::InvalidResponse(detail)
			| ApiError::Transport(detail)
			| ApiError::Encode(detail)
			| ApiError::ClientBuild(detail) => detail.clone(),
			ApiError::RequestFailed { status } => format!("status {status}"),
			ApiError::Backend { status, message } => format!("status {status}: {message}"),
			other => other.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_message_keys() {
		assert_eq!(ApiError::Forbidden.message(), FORBIDDEN_KEY);
		assert_eq!(
			ApiError::RequestFailed { status: 500 }.message(),
			REQUEST_FAILED_KEY
		);
		assert_eq!(
			ApiError::InvalidResponse("eof".into()).message(),
			INVALID_RESPONSE_KEY
		);
		assert_eq!(
			ApiError::Transport("connection refused".into()).message(),
			REQUEST_FAILED_KEY
		);
	}

	#[test]
	fn test_backend_message_is_verbatim() {
		let err = ApiError::Backend {
			status: 400,
			message: "用户名已存在".to_string(),
		};
		assert_eq!(err.message(), "用户名已存在");
		assert!(!err.is_translatable());
		assert_eq!(err.status(), Some(400));
	}

	#[test]
	fn test_backend_message_key_is_translatable() {
		let err = ApiError::Backend {
			status: 400,
			message: "error.invalidDate".to_string(),
		};
		assert!(err.is_translatable());
	}

	#[test]
	fn test_transport_detail_not_in_message() {
		let err = ApiError::Transport("dns error: ritual.invalid".into());
		assert!(!err.message().contains("dns"));
		assert!(err.detail().contains("dns"));
		assert_eq!(err.status(), None);
	}

	#[test]
	fn test_is_unauthorized() {
		assert!(ApiError::RequestFailed { status: 401 }.is_unauthorized());
		assert!(!ApiError::Forbidden.is_unauthorized());
	}
}
