// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator alert sink trait.

use async_trait::async_trait;

use crate::traits::adapter::Adapter;
use crate::types::Alert;

/// Fire-and-forget operational alerting toward the operator.
///
/// Implementations must be best-effort: swallow transport failures (logging
/// them) and never block or fail the buyer-facing reply path.
#[async_trait]
pub trait AlertSink: Adapter {
    /// Delivers an alert. Infallible by contract; failures are logged internally.
    async fn notify(&self, alert: Alert);
}
