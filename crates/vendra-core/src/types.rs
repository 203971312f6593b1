// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Vendra matching engine crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a marketplace seller account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Unique identifier for a buyer-seller conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

/// Unique identifier for a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyerId(pub String);

/// Unique identifier for a listed item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    AiProvider,
    AlertSink,
    DelayScheduler,
}

/// A marketplace seller identity as the engine sees it.
///
/// Maintained by the admin console; the engine only reads it. `paused_until`
/// is the materialized cooldown deadline after a risk event and silences the
/// account the same way `enabled = false` does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub enabled: bool,
    pub auto_confirm: bool,
    /// Cooldown applied after a risk event, in minutes.
    pub pause_duration_minutes: u32,
    pub paused_until: Option<DateTime<Utc>>,
}

impl Account {
    /// Whether the account may produce automated actions at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.paused_until.is_none_or(|until| now >= until)
    }
}

/// An inbound buyer message plus its dispatch context.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub account_id: AccountId,
    pub conversation_id: ConversationId,
    pub buyer_id: BuyerId,
    /// Buyer display name, used for reply template placeholders.
    pub buyer_name: String,
    pub text: String,
    /// Present when the conversation is known to pertain to a specific item.
    pub item_id: Option<ItemId>,
}

/// Item context handed to the AI orchestrator for prompt assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub title: String,
    pub price: f64,
    pub description: String,
}

/// The payload of a configured reply: fixed text or a static image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyPayload {
    Text { content: String },
    Image { url: String },
}

/// Which rule tier produced a reply, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ReplySource {
    ItemReply,
    Keyword,
    Ai,
    DefaultReply,
}

/// The single outbound action the dispatcher emits for an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub account_id: AccountId,
    pub conversation_id: ConversationId,
    pub payload: ReplyPayload,
    pub source: ReplySource,
}

// --- AI provider types ---

/// Role of a chat message sent to the AI provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message in a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A completion request to the AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// The provider's generated reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub text: String,
}

// --- Operator alert types ---

/// Operational alerts raised toward the operator, fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// The AI provider call failed; the buyer got the generic fallback.
    AiFailure {
        account_id: AccountId,
        conversation_id: ConversationId,
        detail: String,
    },
    /// A data-pool card ran low or out of stock during a delivery.
    LowStock {
        card_name: String,
        remaining: usize,
        requested: usize,
    },
    /// An api-type card call failed after all retries.
    DeliveryFailure {
        card_name: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account(enabled: bool) -> Account {
        Account {
            id: AccountId("a1".into()),
            enabled,
            auto_confirm: false,
            pause_duration_minutes: 10,
            paused_until: None,
        }
    }

    #[test]
    fn active_when_enabled_and_unpaused() {
        assert!(account(true).is_active(Utc::now()));
        assert!(!account(false).is_active(Utc::now()));
    }

    #[test]
    fn paused_account_is_inactive_until_deadline() {
        let now = Utc::now();
        let mut acct = account(true);
        acct.paused_until = Some(now + Duration::minutes(10));
        assert!(!acct.is_active(now));
        assert!(acct.is_active(now + Duration::minutes(11)));
    }

    #[test]
    fn reply_payload_serde_is_tagged() {
        let json = serde_json::to_string(&ReplyPayload::Text {
            content: "hi".into(),
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"text\""));
        let back: ReplyPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back,
            ReplyPayload::Text {
                content: "hi".into()
            }
        );
    }
}
