// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP alert sink fanning one alert out to every configured channel.
//!
//! Alert delivery is strictly best-effort: a down webhook must never slow
//! down or fail buyer-facing message processing, so `notify` detaches the
//! sends onto a background task and every transport error ends as a
//! warning log and nothing else.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use vendra_config::model::ChannelConfig;
use vendra_core::types::{AdapterType, Alert, HealthStatus};
use vendra_core::{Adapter, AlertSink, VendraError};

use crate::render;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Fans alerts out to webhook, Bark, DingTalk, and email channels.
pub struct HttpAlertSink {
    channels: Vec<ChannelConfig>,
    http: reqwest::Client,
}

impl HttpAlertSink {
    pub fn new(channels: Vec<ChannelConfig>) -> Self {
        Self {
            channels,
            http: reqwest::Client::new(),
        }
    }
}

/// Sends one alert over one channel.
async fn dispatch(
    http: &reqwest::Client,
    channel: &ChannelConfig,
    alert: &Alert,
) -> Result<(), String> {
    let title = render::title(alert);
    let body = render::body(alert);

    let request = match channel {
        ChannelConfig::Webhook { url, .. } => http.post(url).json(alert),
        ChannelConfig::Bark { base_url, .. } => {
            let mut url = reqwest::Url::parse(base_url)
                .map_err(|e| format!("invalid bark base url: {e}"))?;
            url.path_segments_mut()
                .map_err(|_| "bark base url cannot carry path segments".to_string())?
                .push(&title)
                .push(&body);
            http.get(url)
        }
        ChannelConfig::DingTalk { webhook_url, .. } => {
            http.post(webhook_url).json(&serde_json::json!({
                "msgtype": "text",
                "text": { "content": format!("{title}\n{body}") },
            }))
        }
        ChannelConfig::Email { endpoint, to, .. } => http.post(endpoint).json(&serde_json::json!({
            "to": to,
            "subject": title,
            "body": body,
        })),
    };

    request
        .timeout(SEND_TIMEOUT)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[async_trait]
impl Adapter for HttpAlertSink {
    fn name(&self) -> &str {
        "http-alerts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AlertSink
    }

    async fn health_check(&self) -> Result<HealthStatus, VendraError> {
        // Channels are fire-and-forget; there is nothing to probe without
        // sending a real notification.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendraError> {
        debug!("alert sink shutting down");
        Ok(())
    }
}

#[async_trait]
impl AlertSink for HttpAlertSink {
    /// Detaches the sends so a slow channel never holds up the caller.
    async fn notify(&self, alert: Alert) {
        let channels = self.channels.clone();
        let http = self.http.clone();
        tokio::spawn(async move {
            for channel in &channels {
                match dispatch(&http, channel, &alert).await {
                    Ok(()) => {
                        debug!(channel = channel.name(), alert = ?alert, "alert delivered");
                    }
                    Err(e) => {
                        warn!(channel = channel.name(), error = %e, "alert delivery failed");
                    }
                }
            }
        });
    }
}
