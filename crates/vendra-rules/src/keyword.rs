// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-account keyword rule index with exact-match lookup.
//!
//! Rules are kept in insertion order per account so listings and
//! integer-index deletes stay stable, and "first match wins" is structural
//! rather than incidental. Uniqueness on (keyword, item scope) makes real
//! ties impossible within one scope.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vendra_core::types::{AccountId, ItemId, ReplyPayload};
use vendra_core::VendraError;

/// A configured exact-match trigger mapping a literal phrase to a canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub reply: ReplyPayload,
    /// `None` for generic rules; `Some` scopes the rule to one item.
    pub item_id: Option<ItemId>,
}

/// Per-account mapping from (keyword, optional item scope) to a reply payload.
///
/// Read side is lock-free per shard; the write side (admin console) is
/// comparatively rare.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    rules: DashMap<AccountId, Vec<KeywordRule>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, failing with [`VendraError::DuplicateKeyword`] if a
    /// rule with the same (keyword, item scope) already exists for the
    /// account. A duplicate insert never mutates the index.
    pub fn insert(&self, account_id: &AccountId, rule: KeywordRule) -> Result<(), VendraError> {
        if rule.keyword.is_empty() {
            return Err(VendraError::Config(
                "keyword must be non-empty".to_string(),
            ));
        }

        let mut entry = self.rules.entry(account_id.clone()).or_default();
        if entry
            .iter()
            .any(|r| r.keyword == rule.keyword && r.item_id == rule.item_id)
        {
            return Err(VendraError::DuplicateKeyword {
                account_id: account_id.0.clone(),
                keyword: rule.keyword,
                item_scope: rule.item_id.map(|i| i.0).unwrap_or_default(),
            });
        }

        debug!(
            account_id = %account_id,
            keyword = rule.keyword.as_str(),
            item_scoped = rule.item_id.is_some(),
            "keyword rule inserted"
        );
        entry.push(rule);
        Ok(())
    }

    /// Removes the rule at `index` in insertion order, mirroring the admin
    /// console's list-position delete. Returns the removed rule.
    pub fn delete_by_index(&self, account_id: &AccountId, index: usize) -> Option<KeywordRule> {
        let mut entry = self.rules.get_mut(account_id)?;
        if index >= entry.len() {
            return None;
        }
        Some(entry.remove(index))
    }

    /// Removes a rule by its (keyword, item scope) identity.
    pub fn delete(
        &self,
        account_id: &AccountId,
        keyword: &str,
        item_id: Option<&ItemId>,
    ) -> Option<KeywordRule> {
        let mut entry = self.rules.get_mut(account_id)?;
        let pos = entry
            .iter()
            .position(|r| r.keyword == keyword && r.item_id.as_ref() == item_id)?;
        Some(entry.remove(pos))
    }

    /// Exact, case-sensitive match of `message` against the account's rules:
    /// item-scoped rules for `item_id` first, then generic rules.
    ///
    /// Empty input never matches, even if an empty-string rule were stored.
    /// No trimming: whitespace differences are deliberate mismatches.
    pub fn lookup(
        &self,
        account_id: &AccountId,
        message: &str,
        item_id: Option<&ItemId>,
    ) -> Option<KeywordRule> {
        if message.is_empty() {
            return None;
        }
        let entry = self.rules.get(account_id)?;

        if let Some(item) = item_id
            && let Some(rule) = entry
                .iter()
                .find(|r| r.item_id.as_ref() == Some(item) && r.keyword == message)
        {
            return Some(rule.clone());
        }

        entry
            .iter()
            .find(|r| r.item_id.is_none() && r.keyword == message)
            .cloned()
    }

    /// Lists an account's rules in insertion order.
    pub fn list(&self, account_id: &AccountId) -> Vec<KeywordRule> {
        self.rules
            .get(account_id)
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Drops every rule owned by the account (account deletion cascade).
    pub fn remove_account(&self, account_id: &AccountId) {
        self.rules.remove(account_id);
    }
}
