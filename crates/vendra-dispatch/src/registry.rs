// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory account registry consulted on every inbound message.
//!
//! The engine only reads accounts; the admin console writes them. A paused
//! account silences dispatch exactly like a disabled one until the pause
//! deadline passes, after which it resumes without any explicit unpause.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{info, warn};

use vendra_core::types::{Account, AccountId};

/// Concurrent store of seller accounts keyed by account id.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: DashMap<AccountId, Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account.
    pub fn upsert(&self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }

    /// Returns a copy of the account, if registered.
    pub fn get(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.get(account_id).map(|a| a.clone())
    }

    /// Removes the account; the caller is responsible for cleaning up
    /// per-account state held by the other components.
    pub fn remove(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.remove(account_id).map(|(_, a)| a)
    }

    /// Whether the account may produce automated actions at `now`.
    /// Unknown accounts are inactive.
    pub fn is_active(&self, account_id: &AccountId, now: DateTime<Utc>) -> bool {
        self.accounts
            .get(account_id)
            .map(|a| a.is_active(now))
            .unwrap_or(false)
    }

    /// Applies the account's configured cooldown after a risk event.
    pub fn pause(&self, account_id: &AccountId, now: DateTime<Utc>) {
        let Some(mut account) = self.accounts.get_mut(account_id) else {
            warn!(account_id = %account_id, "pause requested for unknown account");
            return;
        };
        let until = now + Duration::minutes(i64::from(account.pause_duration_minutes));
        account.paused_until = Some(until);
        info!(account_id = %account_id, paused_until = %until, "account paused");
    }

    /// Clears any pending pause deadline.
    pub fn resume(&self, account_id: &AccountId) {
        if let Some(mut account) = self.accounts.get_mut(account_id) {
            account.paused_until = None;
            info!(account_id = %account_id, "account resumed");
        }
    }
}
