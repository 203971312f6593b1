// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine assembly: wires the rule stores, the AI orchestrator, the
//! delivery resolver, and the alert sink into one dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vendra_bargain::{AiReplyOrchestrator, AiSettings, ProviderFactory};
use vendra_config::model::VendraConfig;
use vendra_core::{Adapter, AiProvider, VendraError};
use vendra_delivery::{DeliveryResolver, TokioDelayScheduler};
use vendra_dispatch::{AccountRegistry, MatchDispatcher};
use vendra_notify::HttpAlertSink;
use vendra_provider::OpenAiCompatProvider;
use vendra_rules::{DefaultReplyGate, ItemReplyIndex, KeywordIndex};

/// The assembled engine with every component behind its shared handle.
pub struct Engine {
    pub accounts: Arc<AccountRegistry>,
    pub keywords: Arc<KeywordIndex>,
    pub item_replies: Arc<ItemReplyIndex>,
    pub default_replies: Arc<DefaultReplyGate>,
    pub orchestrator: Arc<AiReplyOrchestrator>,
    pub delivery: Arc<DeliveryResolver>,
    pub scheduler: Arc<TokioDelayScheduler>,
    pub dispatcher: Arc<MatchDispatcher>,
    provider: Arc<OpenAiCompatProvider>,
    alerts: Arc<HttpAlertSink>,
}

/// Pending delayed deliveries held before the transport drains them.
const SCHEDULER_QUEUE_CAPACITY: usize = 256;

impl Engine {
    /// Builds the engine from validated configuration.
    ///
    /// The shared provider uses `ai.api_key` (typically injected through
    /// `VENDRA_AI_API_KEY`); accounts that store their own key get a
    /// dedicated provider built from their settings.
    pub fn from_config(config: &VendraConfig) -> Result<Self, VendraError> {
        let provider = Arc::new(OpenAiCompatProvider::new(
            "openai-compat",
            &config.ai.api_key,
            config.ai.default_base_url.clone(),
            Duration::from_secs(config.ai.request_timeout_secs),
            config.ai.max_retries,
        )?);
        let alerts = Arc::new(HttpAlertSink::new(config.notify.channels.clone()));

        let accounts = Arc::new(AccountRegistry::new());
        let keywords = Arc::new(KeywordIndex::new());
        let item_replies = Arc::new(ItemReplyIndex::new());
        let default_replies = Arc::new(DefaultReplyGate::new());

        let ai = config.ai.clone();
        let provider_factory: ProviderFactory = Arc::new(move |settings: &AiSettings| {
            let base_url = if settings.base_url.is_empty() {
                ai.default_base_url.clone()
            } else {
                settings.base_url.clone()
            };
            Ok(Arc::new(OpenAiCompatProvider::new(
                "openai-compat-account",
                &settings.api_key,
                base_url,
                Duration::from_secs(ai.request_timeout_secs),
                ai.max_retries,
            )?) as Arc<dyn AiProvider>)
        });

        let orchestrator = Arc::new(
            AiReplyOrchestrator::new(provider.clone())
                .with_alerts(alerts.clone())
                .with_provider_factory(provider_factory),
        );
        let delivery = Arc::new(
            DeliveryResolver::new(
                config.delivery.api_card_retries,
                config.delivery.low_stock_threshold,
            )
            .with_alerts(alerts.clone()),
        );
        let scheduler = Arc::new(TokioDelayScheduler::new(SCHEDULER_QUEUE_CAPACITY));

        let dispatcher = Arc::new(MatchDispatcher::new(
            accounts.clone(),
            item_replies.clone(),
            keywords.clone(),
            orchestrator.clone(),
            default_replies.clone(),
            delivery.clone(),
        ));

        info!(
            model = config.ai.default_model.as_str(),
            channels = config.notify.channels.len(),
            "engine assembled"
        );

        Ok(Self {
            accounts,
            keywords,
            item_replies,
            default_replies,
            orchestrator,
            delivery,
            scheduler,
            dispatcher,
            provider,
            alerts,
        })
    }

    /// Gracefully shuts down the engine's adapters.
    pub async fn shutdown(&self) -> Result<(), VendraError> {
        self.provider.shutdown().await?;
        self.scheduler.shutdown().await?;
        self.alerts.shutdown().await?;
        info!("engine shut down");
        Ok(())
    }
}
