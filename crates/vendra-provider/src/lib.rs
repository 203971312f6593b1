// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions provider adapter for Vendra.
//!
//! Wraps [`ChatClient`] behind the [`AiProvider`] trait so the negotiation
//! orchestrator stays provider-agnostic. The default target is the
//! compatible-mode endpoint with model `qwen-plus`, matching what accounts
//! historically configure, but any OpenAI-shaped API works.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;

use vendra_core::traits::adapter::Adapter;
use vendra_core::traits::ai::AiProvider;
use vendra_core::types::{AdapterType, ChatRequest, ChatResponse, HealthStatus};
use vendra_core::VendraError;

pub use client::ChatClient;
use types::ChatCompletionRequest;

/// An [`AiProvider`] backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiCompatProvider {
    client: ChatClient,
    name: String,
}

impl OpenAiCompatProvider {
    /// Creates a provider for the given endpoint and credentials.
    pub fn new(
        name: impl Into<String>,
        api_key: &str,
        base_url: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, VendraError> {
        Ok(Self {
            client: ChatClient::new(api_key, base_url, timeout, max_retries)?,
            name: name.into(),
        })
    }
}

#[async_trait]
impl Adapter for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AiProvider
    }

    async fn health_check(&self) -> Result<HealthStatus, VendraError> {
        // The engine has no side-effect-free probe endpoint guaranteed to
        // exist on compatible-mode APIs, so report healthy if configured.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendraError> {
        Ok(())
    }
}

#[async_trait]
impl AiProvider for OpenAiCompatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, VendraError> {
        let wire = ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
            temperature: None,
        };
        let response = self.client.complete_chat(&wire).await?;
        // complete_chat guarantees at least one choice.
        let text = response.choices[0].message.content.clone();
        Ok(ChatResponse { text })
    }
}
