// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vendra matching engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vendra configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VendraConfig {
    /// Engine-wide behavior settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// AI provider settings and negotiation defaults.
    #[serde(default)]
    pub ai: AiConfig,

    /// Delivery resolution settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Operator notification channels.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Engine-wide behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Display name used in logs.
    #[serde(default = "default_engine_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            log_level: default_log_level(),
        }
    }
}

/// AI provider configuration and per-account negotiation defaults.
///
/// Per-account `AiSettings` override these; the defaults mirror the
/// compatible-mode endpoint the backend historically targeted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    /// Default model identifier when an account does not set one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default OpenAI-compatible API base URL.
    #[serde(default = "default_base_url")]
    pub default_base_url: String,

    /// API key for the shared provider. Usually supplied through the
    /// `VENDRA_AI_API_KEY` environment variable rather than the TOML file.
    /// Accounts carrying their own key use that instead.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout for provider calls, in seconds.
    #[serde(default = "default_ai_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries after a transient provider error (429/500/503).
    #[serde(default = "default_ai_retries")]
    pub max_retries: u32,

    /// Default cap on the discount percentage an account may concede.
    #[serde(default = "default_max_discount_percent")]
    pub default_max_discount_percent: f64,

    /// Default cap on the absolute discount amount an account may concede.
    #[serde(default = "default_max_discount_amount")]
    pub default_max_discount_amount: f64,

    /// Default number of concession rounds before final-offer framing.
    #[serde(default = "default_max_bargain_rounds")]
    pub default_max_bargain_rounds: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            default_base_url: default_base_url(),
            api_key: String::new(),
            request_timeout_secs: default_ai_timeout_secs(),
            max_retries: default_ai_retries(),
            default_max_discount_percent: default_max_discount_percent(),
            default_max_discount_amount: default_max_discount_amount(),
            default_max_bargain_rounds: default_max_bargain_rounds(),
        }
    }
}

/// Delivery resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Timeout for api-type card HTTP calls, in seconds.
    #[serde(default = "default_api_card_timeout_secs")]
    pub api_card_timeout_secs: u64,

    /// Retries for api-type card calls after a transient failure.
    #[serde(default = "default_api_card_retries")]
    pub api_card_retries: u32,

    /// Remaining-pool size at or below which a low-stock alert is raised.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            api_card_timeout_secs: default_api_card_timeout_secs(),
            api_card_retries: default_api_card_retries(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// Operator notification configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Configured alert channels, tried best-effort in order.
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// A notification channel, one structured variant per transport kind.
///
/// Modeled as tagged variants so the required fields per kind are enforced
/// at deserialization time instead of at send time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ChannelConfig {
    /// Plain HTTP webhook receiving the alert as a JSON body.
    Webhook { name: String, url: String },
    /// Bark push endpoint (`{base}/{title}/{body}` GET).
    Bark { name: String, base_url: String },
    /// DingTalk-style group bot webhook with access token in the URL.
    DingTalk { name: String, webhook_url: String },
    /// Email stub: alerts are handed to an external mailer endpoint.
    Email { name: String, endpoint: String, to: String },
}

impl ChannelConfig {
    /// Channel display name for logging.
    pub fn name(&self) -> &str {
        match self {
            ChannelConfig::Webhook { name, .. }
            | ChannelConfig::Bark { name, .. }
            | ChannelConfig::DingTalk { name, .. }
            | ChannelConfig::Email { name, .. } => name,
        }
    }
}

fn default_engine_name() -> String {
    "vendra".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "qwen-plus".to_string()
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

fn default_ai_retries() -> u32 {
    1
}

fn default_max_discount_percent() -> f64 {
    10.0
}

fn default_max_discount_amount() -> f64 {
    100.0
}

fn default_max_bargain_rounds() -> u32 {
    3
}

fn default_api_card_timeout_secs() -> u64 {
    10
}

fn default_api_card_retries() -> u32 {
    2
}

fn default_low_stock_threshold() -> usize {
    5
}
