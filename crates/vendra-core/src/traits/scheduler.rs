// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delay scheduler trait for deferred delivery dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::VendraError;
use crate::traits::adapter::Adapter;
use crate::types::{Action, ConversationId};

/// Accepts a payload plus a future dispatch time and guarantees eventual
/// single delivery. The delivery resolver computes the *what*; this
/// collaborator owns the *when*.
#[async_trait]
pub trait DelayScheduler: Adapter {
    /// Schedules `action` for dispatch at `at`. Returns once enqueued.
    async fn schedule(
        &self,
        conversation_id: ConversationId,
        action: Action,
        at: DateTime<Utc>,
    ) -> Result<(), VendraError>;
}
