// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account default reply with reply-once-per-conversation dedup.
//!
//! The check-and-mark decision is a single atomic map insert, so two
//! near-simultaneous messages in one conversation cannot both claim the
//! default reply. The sent-record is written at decision time, before any
//! transport send, which is what makes the claim race-free.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vendra_core::types::{AccountId, ConversationId};

/// Per-account fallback reply configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultReplySetting {
    pub enabled: bool,
    pub content: String,
    /// When true, at most one default reply per conversation until records
    /// are cleared by an admin action.
    pub reply_once: bool,
}

/// Gate deciding whether a default reply may be sent for a conversation.
#[derive(Debug, Default)]
pub struct DefaultReplyGate {
    settings: DashMap<AccountId, DefaultReplySetting>,
    sent: DashMap<(AccountId, ConversationId), ()>,
}

impl DefaultReplyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the account's default reply setting.
    pub fn upsert_setting(&self, account_id: AccountId, setting: DefaultReplySetting) {
        self.settings.insert(account_id, setting);
    }

    /// Returns the account's setting, if configured.
    pub fn setting(&self, account_id: &AccountId) -> Option<DefaultReplySetting> {
        self.settings.get(account_id).map(|s| s.clone())
    }

    /// Removes the account's setting (records are kept until cleared).
    pub fn remove_setting(&self, account_id: &AccountId) -> Option<DefaultReplySetting> {
        self.settings.remove(account_id).map(|(_, s)| s)
    }

    /// Atomically decides whether to send the default reply for this
    /// conversation and, for `reply_once` accounts, records the send in the
    /// same step. Returns the reply content when the caller should send.
    pub fn try_claim(
        &self,
        account_id: &AccountId,
        conversation_id: &ConversationId,
    ) -> Option<String> {
        let setting = self.settings.get(account_id)?;
        if !setting.enabled || setting.content.is_empty() {
            return None;
        }

        if setting.reply_once {
            let key = (account_id.clone(), conversation_id.clone());
            // `insert` returning a previous value means another message
            // already claimed this conversation.
            if self.sent.insert(key, ()).is_some() {
                debug!(
                    account_id = %account_id,
                    conversation_id = %conversation_id,
                    "default reply suppressed, already sent once"
                );
                return None;
            }
        }

        Some(setting.content.clone())
    }

    /// Read-only probe: would a default reply be sent right now?
    pub fn should_send(&self, account_id: &AccountId, conversation_id: &ConversationId) -> bool {
        let Some(setting) = self.settings.get(account_id) else {
            return false;
        };
        if !setting.enabled || setting.content.is_empty() {
            return false;
        }
        !setting.reply_once
            || !self
                .sent
                .contains_key(&(account_id.clone(), conversation_id.clone()))
    }

    /// Records a send without deciding (external sends, migration imports).
    pub fn mark_sent(&self, account_id: &AccountId, conversation_id: &ConversationId) {
        self.sent
            .insert((account_id.clone(), conversation_id.clone()), ());
    }

    /// Bulk reset of the account's sent-records (admin-triggered).
    pub fn clear_records(&self, account_id: &AccountId) {
        self.sent.retain(|(a, _), _| a != account_id);
        debug!(account_id = %account_id, "default reply records cleared");
    }
}
