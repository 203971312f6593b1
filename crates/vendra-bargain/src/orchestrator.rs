// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateful negotiation orchestrator.
//!
//! One FSM per (account, conversation): Idle -> Negotiating -> Concluded.
//! Each turn snapshots the session under its lock, releases the lock for
//! the provider call, then re-locks to commit the outcome, so a slow
//! provider never stalls other conversations and the per-conversation lock
//! never spans external I/O.
//!
//! Provider failures degrade to a generic buyer-facing fallback and an
//! operator alert; the session survives for retry on the next message.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use vendra_core::types::{
    AccountId, Action, Alert, ChatRequest, ConversationId, InboundMessage, ItemSnapshot,
    ReplyPayload, ReplySource,
};
use vendra_core::{AiProvider, AlertSink, GENERIC_FALLBACK_REPLY, VendraError};

use crate::marker::extract_offer;
use crate::policy::{Offer, clamp_offer};
use crate::prompt::build_messages;
use crate::session::{NegotiationState, Session};
use crate::settings::AiSettings;

type SessionKey = (AccountId, ConversationId);

/// Builds a provider from an account's own credentials.
pub type ProviderFactory =
    Arc<dyn Fn(&AiSettings) -> Result<Arc<dyn AiProvider>, VendraError> + Send + Sync>;

/// Orchestrates AI negotiation replies with bounded concessions.
pub struct AiReplyOrchestrator {
    provider: Arc<dyn AiProvider>,
    provider_factory: Option<ProviderFactory>,
    account_providers: DashMap<AccountId, Arc<dyn AiProvider>>,
    alerts: Option<Arc<dyn AlertSink>>,
    settings: DashMap<AccountId, AiSettings>,
    sessions: DashMap<SessionKey, Arc<Mutex<Session>>>,
}

impl AiReplyOrchestrator {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self {
            provider,
            provider_factory: None,
            account_providers: DashMap::new(),
            alerts: None,
            settings: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// Attaches a best-effort operator alert sink.
    pub fn with_alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Attaches a factory building dedicated providers for accounts that
    /// carry their own API key. Without one, every account shares the
    /// default provider.
    pub fn with_provider_factory(mut self, factory: ProviderFactory) -> Self {
        self.provider_factory = Some(factory);
        self
    }

    /// Sets or replaces an account's negotiation settings.
    pub fn upsert_settings(&self, account_id: AccountId, settings: AiSettings) {
        // Credentials may have changed; the cached provider rebuilds lazily.
        self.account_providers.remove(&account_id);
        self.settings.insert(account_id, settings);
    }

    /// Returns the account's settings, if configured.
    pub fn settings(&self, account_id: &AccountId) -> Option<AiSettings> {
        self.settings.get(account_id).map(|s| s.clone())
    }

    /// Whether AI negotiation is enabled for the account.
    pub fn ai_enabled(&self, account_id: &AccountId) -> bool {
        self.settings
            .get(account_id)
            .map(|s| s.ai_enabled)
            .unwrap_or(false)
    }

    /// Current FSM state for a conversation (Idle when never seen).
    pub async fn session_state(
        &self,
        account_id: &AccountId,
        conversation_id: &ConversationId,
    ) -> NegotiationState {
        match self
            .sessions
            .get(&(account_id.clone(), conversation_id.clone()))
        {
            Some(session) => session.lock().await.state,
            None => NegotiationState::Idle,
        }
    }

    /// Drops the account's settings, its provider, and every session it owns.
    pub fn remove_account(&self, account_id: &AccountId) {
        self.settings.remove(account_id);
        self.account_providers.remove(account_id);
        self.sessions.retain(|(a, _), _| a != account_id);
    }

    /// Resolves the provider serving this account: a cached per-account
    /// client when the settings carry an API key and a factory is
    /// attached, the shared default provider otherwise.
    fn provider_for(
        &self,
        account_id: &AccountId,
        settings: &AiSettings,
    ) -> Result<Arc<dyn AiProvider>, VendraError> {
        if settings.api_key.is_empty() {
            return Ok(self.provider.clone());
        }
        let Some(factory) = &self.provider_factory else {
            return Ok(self.provider.clone());
        };
        if let Some(cached) = self.account_providers.get(account_id) {
            return Ok(cached.clone());
        }
        let built = factory(settings)?;
        self.account_providers
            .insert(account_id.clone(), built.clone());
        Ok(built)
    }

    /// Handles one inbound message for a conversation.
    ///
    /// Returns `Ok(None)` when AI negotiation is not enabled for the
    /// account. Provider failures never surface to the buyer: the reply
    /// degrades to a generic fallback and the failure is alerted.
    pub async fn handle(
        &self,
        msg: &InboundMessage,
        item: Option<&ItemSnapshot>,
    ) -> Result<Option<Action>, VendraError> {
        let Some(settings) = self.settings(&msg.account_id) else {
            return Ok(None);
        };
        if !settings.ai_enabled {
            return Ok(None);
        }

        let key = (msg.account_id.clone(), msg.conversation_id.clone());
        let session = self
            .sessions
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone();

        // Snapshot under the lock, then release it for the provider call.
        let snapshot = {
            let mut guard = session.lock().await;
            if guard.state == NegotiationState::Idle {
                guard.state = NegotiationState::Negotiating;
                debug!(
                    account_id = %msg.account_id,
                    conversation_id = %msg.conversation_id,
                    "negotiation session opened"
                );
            }
            guard.clone()
        };

        let request = ChatRequest {
            model: settings.model_name.clone(),
            messages: build_messages(&settings, item, &snapshot, &msg.text),
        };

        let completion = match self.provider_for(&msg.account_id, &settings) {
            Ok(provider) => provider.complete(request).await,
            Err(e) => Err(e),
        };
        let response = match completion {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    account_id = %msg.account_id,
                    conversation_id = %msg.conversation_id,
                    error = %e,
                    "AI provider call failed, degrading to fallback reply"
                );
                self.alert(Alert::AiFailure {
                    account_id: msg.account_id.clone(),
                    conversation_id: msg.conversation_id.clone(),
                    detail: e.to_string(),
                })
                .await;
                // State is untouched: the next message retries normally.
                return Ok(Some(self.action(msg, GENERIC_FALLBACK_REPLY.to_string())));
            }
        };

        let (proposed, cleaned) = extract_offer(&response.text);
        let price = item.map(|i| i.price).unwrap_or(0.0);

        // Re-acquire the lock to commit the turn's outcome.
        let mut guard = session.lock().await;
        let mut reply_text = cleaned;

        match (guard.state, proposed) {
            (NegotiationState::Concluded, _) | (_, None) => {
                // No concession this turn; markers (if any) were stripped
                // without being applied.
            }
            (_, Some(proposed)) => {
                let offer = clamp_offer(proposed, price, &settings);
                if offer == Offer::NONE {
                    debug!("proposed offer clamped to nothing, not counted as a round");
                } else {
                    guard.record_concession(offer, settings.max_bargain_rounds);
                    info!(
                        account_id = %msg.account_id,
                        conversation_id = %msg.conversation_id,
                        percent = offer.percent,
                        amount = offer.amount,
                        rounds_used = guard.rounds_used,
                        state = %guard.state,
                        "concession recorded"
                    );
                    if reply_text.is_empty() {
                        reply_text = format!(
                            "I can take {:.2} off, that is my best offer.",
                            offer.amount
                        );
                    }
                }
            }
        }
        drop(guard);

        if reply_text.is_empty() {
            reply_text = GENERIC_FALLBACK_REPLY.to_string();
        }

        Ok(Some(self.action(msg, reply_text)))
    }

    fn action(&self, msg: &InboundMessage, text: String) -> Action {
        Action {
            account_id: msg.account_id.clone(),
            conversation_id: msg.conversation_id.clone(),
            payload: ReplyPayload::Text { content: text },
            source: ReplySource::Ai,
        }
    }

    async fn alert(&self, alert: Alert) {
        if let Some(sink) = &self.alerts {
            sink.notify(alert).await;
        }
    }
}
