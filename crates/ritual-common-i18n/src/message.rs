// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Prefix marking a string as a translatable message key rather than an
/// already-localized backend message.
pub const MESSAGE_KEY_PREFIX: &str = "error.";

/// Returns true if `message` is a message key the UI should translate.
pub fn is_message_key(message: &str) -> bool {
	message.starts_with(MESSAGE_KEY_PREFIX)
}
