// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI provider for deterministic testing.
//!
//! `MockAi` implements `AiProvider` with pre-configured responses, enabling
//! fast, CI-runnable negotiation tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vendra_core::traits::adapter::Adapter;
use vendra_core::traits::ai::AiProvider;
use vendra_core::types::{AdapterType, ChatRequest, ChatResponse, HealthStatus};
use vendra_core::VendraError;

/// A mock AI provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. A queued response of
/// `"!fail"` makes that call return a provider error instead, for
/// failure-path testing.
pub struct MockAi {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockAi {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Queue a provider failure for the next call.
    pub async fn add_failure(&self) {
        self.responses.lock().await.push_back("!fail".to_string());
    }

    /// Requests observed so far, for prompt assertions.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockAi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockAi {
    fn name(&self) -> &str {
        "mock-ai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AiProvider
    }

    async fn health_check(&self) -> Result<HealthStatus, VendraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendraError> {
        Ok(())
    }
}

#[async_trait]
impl AiProvider for MockAi {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, VendraError> {
        self.requests.lock().await.push(request);
        let text = self.next_response().await;
        if text == "!fail" {
            return Err(VendraError::Provider {
                message: "mock provider failure".into(),
                source: None,
            });
        }
        Ok(ChatResponse { text })
    }
}
