// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dispatch tests exercising the full reply chain with a mock
//! AI provider.

use std::sync::Arc;

use chrono::Utc;

use vendra_bargain::{AiReplyOrchestrator, AiSettings};
use vendra_core::types::{
    Account, AccountId, BuyerId, ConversationId, InboundMessage, ItemId, ReplyPayload,
    ReplySource,
};
use vendra_core::GENERIC_FALLBACK_REPLY;
use vendra_delivery::DeliveryResolver;
use vendra_dispatch::{AccountRegistry, MatchDispatcher};
use vendra_rules::{
    DefaultReplyGate, DefaultReplySetting, ItemReplyIndex, KeywordIndex, KeywordRule,
};
use vendra_test_utils::MockAi;

struct Harness {
    accounts: Arc<AccountRegistry>,
    keywords: Arc<KeywordIndex>,
    item_replies: Arc<ItemReplyIndex>,
    default_replies: Arc<DefaultReplyGate>,
    ai: Arc<AiReplyOrchestrator>,
    mock: Arc<MockAi>,
    dispatcher: MatchDispatcher,
}

fn harness() -> Harness {
    let accounts = Arc::new(AccountRegistry::new());
    let keywords = Arc::new(KeywordIndex::new());
    let item_replies = Arc::new(ItemReplyIndex::new());
    let default_replies = Arc::new(DefaultReplyGate::new());
    let mock = Arc::new(MockAi::new());
    let ai = Arc::new(AiReplyOrchestrator::new(mock.clone()));
    let delivery = Arc::new(DeliveryResolver::new(0, 0));

    let dispatcher = MatchDispatcher::new(
        accounts.clone(),
        item_replies.clone(),
        keywords.clone(),
        ai.clone(),
        default_replies.clone(),
        delivery,
    );

    Harness {
        accounts,
        keywords,
        item_replies,
        default_replies,
        ai,
        mock,
        dispatcher,
    }
}

fn account(id: &str) -> Account {
    Account {
        id: AccountId(id.into()),
        enabled: true,
        auto_confirm: false,
        pause_duration_minutes: 10,
        paused_until: None,
    }
}

fn msg(account: &str, conversation: &str, text: &str, item: Option<&str>) -> InboundMessage {
    InboundMessage {
        account_id: AccountId(account.into()),
        conversation_id: ConversationId(conversation.into()),
        buyer_id: BuyerId("buyer-1".into()),
        buyer_name: "小明".into(),
        text: text.into(),
        item_id: item.map(|i| ItemId(i.into())),
    }
}

fn text_rule(keyword: &str, reply: &str, item: Option<&str>) -> KeywordRule {
    KeywordRule {
        keyword: keyword.into(),
        reply: ReplyPayload::Text {
            content: reply.into(),
        },
        item_id: item.map(|i| ItemId(i.into())),
    }
}

fn payload_text(action: &vendra_core::types::Action) -> &str {
    match &action.payload {
        ReplyPayload::Text { content } => content,
        ReplyPayload::Image { .. } => panic!("expected a text payload"),
    }
}

#[tokio::test]
async fn unknown_or_disabled_accounts_are_silent() {
    let h = harness();
    // Unknown account.
    let action = h.dispatcher.resolve(&msg("ghost", "c1", "在吗", None)).await.unwrap();
    assert!(action.is_none());

    // Registered but disabled.
    let mut acct = account("a1");
    acct.enabled = false;
    h.accounts.upsert(acct);
    h.default_replies.upsert_setting(
        AccountId("a1".into()),
        DefaultReplySetting {
            enabled: true,
            content: "hi".into(),
            reply_once: false,
        },
    );
    let action = h.dispatcher.resolve(&msg("a1", "c1", "在吗", None)).await.unwrap();
    assert!(action.is_none());
}

#[tokio::test]
async fn paused_account_is_silent_until_the_deadline() {
    let h = harness();
    h.accounts.upsert(account("a1"));
    h.keywords
        .insert(&AccountId("a1".into()), text_rule("价格", "¥99", None))
        .unwrap();

    h.accounts.pause(&AccountId("a1".into()), Utc::now());
    let action = h.dispatcher.resolve(&msg("a1", "c1", "价格", None)).await.unwrap();
    assert!(action.is_none());

    h.accounts.resume(&AccountId("a1".into()));
    let action = h.dispatcher.resolve(&msg("a1", "c1", "价格", None)).await.unwrap();
    assert_eq!(action.unwrap().source, ReplySource::Keyword);
}

#[tokio::test]
async fn empty_message_never_matches_anything() {
    let h = harness();
    h.accounts.upsert(account("a1"));
    h.default_replies.upsert_setting(
        AccountId("a1".into()),
        DefaultReplySetting {
            enabled: true,
            content: "hello".into(),
            reply_once: false,
        },
    );

    let action = h.dispatcher.resolve(&msg("a1", "c1", "", None)).await.unwrap();
    assert!(action.is_none());
}

#[tokio::test]
async fn item_reply_outranks_keyword_and_default() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.item_replies
        .upsert(acct.clone(), ItemId("ITEM1".into()), "item says hi".into());
    h.keywords
        .insert(&acct, text_rule("在吗", "keyword says hi", None))
        .unwrap();
    h.default_replies.upsert_setting(
        acct.clone(),
        DefaultReplySetting {
            enabled: true,
            content: "default says hi".into(),
            reply_once: false,
        },
    );

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "在吗", Some("ITEM1")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::ItemReply);
    assert_eq!(payload_text(&action), "item says hi");

    // Without item context, the keyword tier wins.
    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "在吗", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::Keyword);
}

#[tokio::test]
async fn item_scoped_keyword_beats_generic_for_the_same_phrase() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.keywords.insert(&acct, text_rule("价格", "¥99", None)).unwrap();
    h.keywords
        .insert(&acct, text_rule("价格", "¥199", Some("B")))
        .unwrap();

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "价格", Some("B")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload_text(&action), "¥199");

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "价格", Some("A")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload_text(&action), "¥99");
}

#[tokio::test]
async fn keyword_replies_render_placeholders() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.keywords
        .insert(&acct, text_rule("在吗", "你好 {send_user_name}", None))
        .unwrap();

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "在吗", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload_text(&action), "你好 小明");
}

#[tokio::test]
async fn ai_reply_shadows_the_default_reply() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.ai.upsert_settings(
        acct.clone(),
        AiSettings {
            ai_enabled: true,
            ..AiSettings::default()
        },
    );
    h.default_replies.upsert_setting(
        acct.clone(),
        DefaultReplySetting {
            enabled: true,
            content: "default says hi".into(),
            reply_once: false,
        },
    );
    h.mock.add_response("这个可以小刀哦".into()).await;

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "能便宜点吗", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::Ai);
    assert_eq!(payload_text(&action), "这个可以小刀哦");
}

#[tokio::test]
async fn ai_failure_degrades_without_falling_through_to_default() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.ai.upsert_settings(
        acct.clone(),
        AiSettings {
            ai_enabled: true,
            ..AiSettings::default()
        },
    );
    h.default_replies.upsert_setting(
        acct.clone(),
        DefaultReplySetting {
            enabled: true,
            content: "default says hi".into(),
            reply_once: false,
        },
    );
    h.mock.add_failure().await;

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "能便宜点吗", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::Ai);
    assert_eq!(payload_text(&action), GENERIC_FALLBACK_REPLY);
}

#[tokio::test]
async fn default_reply_fires_only_when_nothing_else_matches() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.keywords.insert(&acct, text_rule("价格", "¥99", None)).unwrap();
    h.default_replies.upsert_setting(
        acct.clone(),
        DefaultReplySetting {
            enabled: true,
            content: "稍等，马上回复".into(),
            reply_once: false,
        },
    );

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "随便聊聊", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::DefaultReply);

    let action = h
        .dispatcher
        .resolve(&msg("a1", "c1", "价格", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.source, ReplySource::Keyword);
}

#[tokio::test]
async fn reply_once_default_fires_exactly_once_per_conversation() {
    let h = harness();
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.default_replies.upsert_setting(
        acct.clone(),
        DefaultReplySetting {
            enabled: true,
            content: "欢迎".into(),
            reply_once: true,
        },
    );

    let first = h.dispatcher.resolve(&msg("a1", "c1", "在吗", None)).await.unwrap();
    assert!(first.is_some());
    let second = h.dispatcher.resolve(&msg("a1", "c1", "还在吗", None)).await.unwrap();
    assert!(second.is_none());

    // A different conversation gets its own default reply.
    let other = h.dispatcher.resolve(&msg("a1", "c2", "在吗", None)).await.unwrap();
    assert!(other.is_some());
}

#[tokio::test]
async fn concurrent_messages_claim_at_most_one_default_reply() {
    let h = Arc::new(harness());
    let acct = AccountId("a1".into());
    h.accounts.upsert(account("a1"));
    h.default_replies.upsert_setting(
        acct,
        DefaultReplySetting {
            enabled: true,
            content: "欢迎".into(),
            reply_once: true,
        },
    );

    let mut handles = Vec::new();
    for i in 0..32 {
        let h = Arc::clone(&h);
        handles.push(tokio::spawn(async move {
            h.dispatcher
                .resolve(&msg("a1", "c1", &format!("消息 {i}"), None))
                .await
                .unwrap()
        }));
    }

    let mut sent = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            sent += 1;
        }
    }
    assert_eq!(sent, 1);
}
