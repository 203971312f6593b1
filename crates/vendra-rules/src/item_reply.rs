// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-item override replies, independent of keyword matching.

use dashmap::DashMap;

use vendra_core::types::{AccountId, ItemId};

/// At most one override reply per (account, item). When the inbound message
/// is known to pertain to that item, this reply takes precedence over any
/// keyword rule.
#[derive(Debug, Default)]
pub struct ItemReplyIndex {
    replies: DashMap<(AccountId, ItemId), String>,
}

impl ItemReplyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the override reply for (account, item).
    pub fn upsert(&self, account_id: AccountId, item_id: ItemId, content: String) {
        self.replies.insert((account_id, item_id), content);
    }

    /// Returns the override reply for (account, item), if configured.
    pub fn get(&self, account_id: &AccountId, item_id: &ItemId) -> Option<String> {
        self.replies
            .get(&(account_id.clone(), item_id.clone()))
            .map(|r| r.clone())
    }

    /// Removes the override reply for (account, item).
    pub fn remove(&self, account_id: &AccountId, item_id: &ItemId) -> Option<String> {
        self.replies
            .remove(&(account_id.clone(), item_id.clone()))
            .map(|(_, v)| v)
    }

    /// Drops every reply owned by the account (account deletion cascade).
    pub fn remove_account(&self, account_id: &AccountId) {
        self.replies.retain(|(a, _), _| a != account_id);
    }
}
