// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vendra marketplace matching engine.
//!
//! This crate provides the foundational error type, identifier newtypes,
//! message/action types, and the traits implemented by external
//! collaborators (AI provider, alert sink, delay scheduler).

pub mod error;
pub mod traits;
pub mod types;

pub use error::{GENERIC_FALLBACK_REPLY, VendraError};
pub use types::{
    AccountId, Action, AdapterType, BuyerId, ConversationId, HealthStatus, ItemId, ReplyPayload,
    ReplySource,
};

pub use traits::{Adapter, AiProvider, AlertSink, DelayScheduler};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendra_error_has_all_variants() {
        let _config = VendraError::Config("test".into());
        let _dup = VendraError::DuplicateKeyword {
            account_id: "a".into(),
            keyword: "k".into(),
            item_scope: String::new(),
        };
        let _provider = VendraError::Provider {
            message: "test".into(),
            source: None,
        };
        let _delivery = VendraError::Delivery {
            message: "test".into(),
            source: None,
        };
        let _timeout = VendraError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = VendraError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;
        for t in [
            AdapterType::AiProvider,
            AdapterType::AlertSink,
            AdapterType::DelayScheduler,
        ] {
            let s = t.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), t);
        }
    }
}
