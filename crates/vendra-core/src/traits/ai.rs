// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI provider trait for chat-completion-style language model backends.

use async_trait::async_trait;

use crate::error::VendraError;
use crate::traits::adapter::Adapter;
use crate::types::{ChatRequest, ChatResponse};

/// A chat-completion-style AI backend used for negotiation replies.
///
/// Implementations must enforce a bounded request timeout; callers never
/// hold per-conversation locks across this await point.
#[async_trait]
pub trait AiProvider: Adapter {
    /// Sends a completion request and returns the generated reply text.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, VendraError>;
}
