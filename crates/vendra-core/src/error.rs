// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vendra matching engine.

use thiserror::Error;

/// The primary error type used across all Vendra crates.
#[derive(Debug, Error)]
pub enum VendraError {
    /// Configuration errors (invalid TOML, missing required fields, invalid caps).
    #[error("configuration error: {0}")]
    Config(String),

    /// A keyword rule with the same (keyword, item scope) already exists for the account.
    #[error("duplicate keyword rule for account {account_id}: keyword `{keyword}`, item scope `{item_scope}`")]
    DuplicateKeyword {
        account_id: String,
        keyword: String,
        /// Empty string for generic (non item-scoped) rules.
        item_scope: String,
    },

    /// AI provider errors (API failure, malformed response, auth).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Delivery resolution errors (card misconfiguration, api-card call failure).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Buyer-facing degradation text used whenever an internal failure must be
/// masked. Internal detail goes to tracing and operator alerts only.
pub const GENERIC_FALLBACK_REPLY: &str =
    "Sorry, something went wrong on our side. Please contact the seller directly.";
