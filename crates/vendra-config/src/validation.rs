// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-negative discount caps, positive timeouts,
//! and well-formed notification channels.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{ChannelConfig, VendraConfig};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VendraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.engine.log_level
            ),
        });
    }

    if config.engine.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "engine.name must not be empty".to_string(),
        });
    }

    if config.ai.default_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "ai.default_model must not be empty".to_string(),
        });
    }

    if config.ai.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "ai.request_timeout_secs must be positive".to_string(),
        });
    }

    if config.ai.default_max_discount_percent < 0.0
        || config.ai.default_max_discount_percent > 100.0
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "ai.default_max_discount_percent must be within 0..=100, got {}",
                config.ai.default_max_discount_percent
            ),
        });
    }

    if config.ai.default_max_discount_amount < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "ai.default_max_discount_amount must be non-negative, got {}",
                config.ai.default_max_discount_amount
            ),
        });
    }

    if config.ai.default_max_bargain_rounds == 0 {
        errors.push(ConfigError::Validation {
            message: "ai.default_max_bargain_rounds must be at least 1".to_string(),
        });
    }

    if config.delivery.api_card_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "delivery.api_card_timeout_secs must be positive".to_string(),
        });
    }

    // Validate notification channels: non-empty endpoints, unique names.
    let mut seen_names = HashSet::new();
    for (i, channel) in config.notify.channels.iter().enumerate() {
        if channel.name().trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("notify.channels[{i}].name must not be empty"),
            });
        }
        if !seen_names.insert(channel.name().to_string()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate notification channel name `{}`",
                    channel.name()
                ),
            });
        }

        let endpoint = match channel {
            ChannelConfig::Webhook { url, .. } => url,
            ChannelConfig::Bark { base_url, .. } => base_url,
            ChannelConfig::DingTalk { webhook_url, .. } => webhook_url,
            ChannelConfig::Email { endpoint, .. } => endpoint,
        };
        if endpoint.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "notification channel `{}` has an empty endpoint",
                    channel.name()
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
