// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokio-backed delay scheduler for deferred dispatch.
//!
//! Each scheduled action gets one timer task; when the deadline passes the
//! action is handed to the outbound queue exactly once. The transport
//! drains the queue with [`TokioDelayScheduler::next_due`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use vendra_core::types::{Action, AdapterType, ConversationId, HealthStatus};
use vendra_core::{Adapter, DelayScheduler, VendraError};

/// Schedules actions on the tokio timer wheel and queues them when due.
pub struct TokioDelayScheduler {
    tx: mpsc::Sender<Action>,
    rx: tokio::sync::Mutex<mpsc::Receiver<Action>>,
}

impl TokioDelayScheduler {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Waits for the next action whose deadline has passed. Returns `None`
    /// once the scheduler has shut down and the queue is drained.
    pub async fn next_due(&self) -> Option<Action> {
        self.rx.lock().await.recv().await
    }
}

#[async_trait]
impl Adapter for TokioDelayScheduler {
    fn name(&self) -> &str {
        "tokio-delay"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::DelayScheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, VendraError> {
        if self.tx.is_closed() {
            return Ok(HealthStatus::Unhealthy("outbound queue closed".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendraError> {
        debug!("delay scheduler shutting down");
        Ok(())
    }
}

#[async_trait]
impl DelayScheduler for TokioDelayScheduler {
    async fn schedule(
        &self,
        conversation_id: ConversationId,
        action: Action,
        at: DateTime<Utc>,
    ) -> Result<(), VendraError> {
        // A deadline already in the past dispatches immediately.
        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        debug!(
            conversation_id = %conversation_id,
            delay_secs = delay.as_secs(),
            "delivery scheduled"
        );

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(action).await.is_err() {
                warn!(
                    conversation_id = %conversation_id,
                    "outbound queue closed, scheduled delivery dropped"
                );
            }
        });
        Ok(())
    }
}
