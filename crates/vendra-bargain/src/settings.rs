// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account AI negotiation settings.

use serde::{Deserialize, Serialize};

/// Per-account negotiation configuration, maintained by the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    pub ai_enabled: bool,
    pub model_name: String,
    /// Account-specific provider credential; empty means the shared
    /// provider serves this account.
    pub api_key: String,
    /// Endpoint for the account's own provider; only consulted when
    /// `api_key` is set.
    pub base_url: String,
    /// Cap on the discount percentage, 0..=100.
    pub max_discount_percent: f64,
    /// Cap on the absolute discount amount, in the listing currency.
    pub max_discount_amount: f64,
    /// Concession turns allowed per conversation before final-offer framing.
    pub max_bargain_rounds: u32,
    /// Operator-authored system instructions, prefixed to every prompt.
    pub custom_prompts: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            ai_enabled: false,
            model_name: "qwen-plus".to_string(),
            api_key: String::new(),
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            max_discount_percent: 10.0,
            max_discount_amount: 100.0,
            max_bargain_rounds: 3,
            custom_prompts: String::new(),
        }
    }
}
