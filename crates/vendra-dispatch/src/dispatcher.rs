// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The priority-ordered reply chain, one decision per inbound message.
//!
//! Tiers are tried strictly in order: item reply, keyword rule, AI
//! negotiation, default reply. The first tier that claims the message wins
//! and at most one action comes out. When AI negotiation is enabled its
//! outcome is final: the default reply never papers over an AI response,
//! including the degraded fallback after a provider failure.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use vendra_bargain::AiReplyOrchestrator;
use vendra_core::types::{
    AccountId, Action, InboundMessage, ItemId, ItemSnapshot, ReplyPayload, ReplySource,
};
use vendra_core::VendraError;
use vendra_delivery::{DeliveryAction, DeliveryResolver, SpecScope};
use vendra_rules::{render_reply, DefaultReplyGate, ItemReplyIndex, KeywordIndex};

use crate::registry::AccountRegistry;

/// Routes each inbound message through the reply chain and exposes the
/// delivery entry point for purchase confirmations.
pub struct MatchDispatcher {
    accounts: Arc<AccountRegistry>,
    item_replies: Arc<ItemReplyIndex>,
    keywords: Arc<KeywordIndex>,
    ai: Arc<AiReplyOrchestrator>,
    default_replies: Arc<DefaultReplyGate>,
    delivery: Arc<DeliveryResolver>,
    /// Item context for AI prompt assembly, maintained by the admin console.
    items: dashmap::DashMap<(AccountId, ItemId), ItemSnapshot>,
}

impl MatchDispatcher {
    pub fn new(
        accounts: Arc<AccountRegistry>,
        item_replies: Arc<ItemReplyIndex>,
        keywords: Arc<KeywordIndex>,
        ai: Arc<AiReplyOrchestrator>,
        default_replies: Arc<DefaultReplyGate>,
        delivery: Arc<DeliveryResolver>,
    ) -> Self {
        Self {
            accounts,
            item_replies,
            keywords,
            ai,
            default_replies,
            delivery,
            items: dashmap::DashMap::new(),
        }
    }

    /// Registers item context used when assembling AI prompts.
    pub fn upsert_item_snapshot(&self, account_id: AccountId, item: ItemSnapshot) {
        self.items.insert((account_id, item.item_id.clone()), item);
    }

    /// Resolves one inbound message to at most one outbound action.
    pub async fn resolve(&self, msg: &InboundMessage) -> Result<Option<Action>, VendraError> {
        if !self.accounts.is_active(&msg.account_id, Utc::now()) {
            debug!(account_id = %msg.account_id, "account inactive, message ignored");
            return Ok(None);
        }
        if msg.text.is_empty() {
            return Ok(None);
        }

        // Tier 1: per-item automatic reply.
        if let Some(item_id) = &msg.item_id
            && let Some(content) = self.item_replies.get(&msg.account_id, item_id)
        {
            return Ok(Some(self.emit(
                msg,
                ReplyPayload::Text {
                    content: render_reply(&content, msg),
                },
                ReplySource::ItemReply,
            )));
        }

        // Tier 2: exact keyword match, item-scoped before generic.
        if let Some(rule) = self
            .keywords
            .lookup(&msg.account_id, &msg.text, msg.item_id.as_ref())
        {
            let payload = match rule.reply {
                ReplyPayload::Text { content } => ReplyPayload::Text {
                    content: render_reply(&content, msg),
                },
                image @ ReplyPayload::Image { .. } => image,
            };
            return Ok(Some(self.emit(msg, payload, ReplySource::Keyword)));
        }

        // Tier 3: AI negotiation. When enabled, its outcome is final;
        // the default reply must never shadow it.
        if self.ai.ai_enabled(&msg.account_id) {
            let item = msg.item_id.as_ref().and_then(|item_id| {
                self.items
                    .get(&(msg.account_id.clone(), item_id.clone()))
                    .map(|i| i.clone())
            });
            return self.ai.handle(msg, item.as_ref()).await;
        }

        // Tier 4: default reply, at most once per conversation when the
        // account opted into reply-once.
        if let Some(content) = self
            .default_replies
            .try_claim(&msg.account_id, &msg.conversation_id)
        {
            return Ok(Some(self.emit(
                msg,
                ReplyPayload::Text {
                    content: render_reply(&content, msg),
                },
                ReplySource::DefaultReply,
            )));
        }

        debug!(
            account_id = %msg.account_id,
            conversation_id = %msg.conversation_id,
            "no tier claimed the message"
        );
        Ok(None)
    }

    /// Resolves a purchase confirmation to a delivery action, independently
    /// of the reply chain. Inactive accounts deliver nothing.
    pub async fn resolve_delivery(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        keyword: &str,
        purchased_quantity: u32,
        spec: Option<&SpecScope>,
    ) -> Result<Option<DeliveryAction>, VendraError> {
        if !self.accounts.is_active(account_id, Utc::now()) {
            debug!(account_id = %account_id, "account inactive, delivery skipped");
            return Ok(None);
        }
        self.delivery
            .resolve(account_id, item_id, keyword, purchased_quantity, spec)
            .await
    }

    fn emit(&self, msg: &InboundMessage, payload: ReplyPayload, source: ReplySource) -> Action {
        info!(
            account_id = %msg.account_id,
            conversation_id = %msg.conversation_id,
            source = %source,
            "reply resolved"
        );
        Action {
            account_id: msg.account_id.clone(),
            conversation_id: msg.conversation_id.clone(),
            payload,
            source,
        }
    }
}
