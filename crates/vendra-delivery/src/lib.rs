// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automated delivery for Vendra: cards, data pools, delivery rules, and
//! the resolver that turns purchase events into delivery actions.

pub mod card;
pub mod pool;
pub mod resolver;
pub mod rules;
pub mod scheduler;

pub use card::{ApiCardConfig, ApiMethod, Card, CardId, CardKind, SpecScope};
pub use pool::{DataPool, DrawOutcome};
pub use resolver::{DeliveryAction, DeliveryPayload, DeliveryResolver, StockStatus};
pub use rules::{DeliveryRule, ItemFlags, RuleId};
pub use scheduler::TokioDelayScheduler;
