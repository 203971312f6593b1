// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery rules binding trigger keywords to cards.

use serde::{Deserialize, Serialize};

use vendra_core::types::AccountId;

use crate::card::CardId;

/// Unique identifier for a delivery rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub u64);

/// Binding between a purchase-triggering keyword and a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRule {
    pub id: RuleId,
    pub account_id: AccountId,
    pub keyword: String,
    pub card_id: CardId,
    /// Draws from a data pool per delivery event, at least 1.
    pub delivery_count: usize,
    pub enabled: bool,
    pub description: String,
}

impl DeliveryRule {
    /// Validates the rule's hard invariants at configuration time.
    pub fn validate(&self) -> Result<(), vendra_core::VendraError> {
        if self.keyword.trim().is_empty() {
            return Err(vendra_core::VendraError::Config(format!(
                "delivery rule {} has an empty keyword",
                self.id.0
            )));
        }
        if self.delivery_count == 0 {
            return Err(vendra_core::VendraError::Config(format!(
                "delivery rule {} must have delivery_count >= 1",
                self.id.0
            )));
        }
        Ok(())
    }
}

/// Per-(account, item) delivery behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    /// The item has sellable variants that can scope cards.
    pub is_multi_spec: bool,
    /// When true, delivery output scales with purchased unit count.
    pub multi_quantity_delivery: bool,
}
