// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery resolution: from a purchase-triggering keyword to a concrete
//! delivery action.
//!
//! The resolver computes the *what* (payload, stock status, scheduled
//! time); it never sleeps out a delay and never sends anything itself.
//! Data-pool claims happen inside the pool's own critical section, so
//! concurrent purchase events for the same card cannot double-issue a
//! line. The api-card HTTP call is the only await in the path and holds
//! no lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use vendra_core::types::{AccountId, Alert, ItemId};
use vendra_core::{AlertSink, VendraError};

use crate::card::{ApiCardConfig, ApiMethod, Card, CardId, CardKind, SpecScope};
use crate::pool::DrawOutcome;
use crate::rules::{DeliveryRule, ItemFlags};

/// Stock satisfaction of a delivery, kept as three distinct cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    /// The requested payload was produced in full.
    Satisfied,
    /// A data pool held fewer lines than requested; what remained was
    /// claimed and delivered.
    Short { delivered: usize, requested: usize },
    /// The data pool was already empty; nothing was delivered.
    Exhausted,
}

/// The payload of a resolved delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPayload {
    Text(String),
    Image { url: String },
    /// Claimed data-pool lines, in claim order.
    Lines(Vec<String>),
}

/// A fully resolved delivery, ready for the transport or the delay scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAction {
    pub card_id: CardId,
    pub card_name: String,
    pub payload: DeliveryPayload,
    /// Set when the card carries a positive delay; the caller hands the
    /// action to the delay scheduler instead of sending inline.
    pub dispatch_at: Option<DateTime<Utc>>,
    pub stock: StockStatus,
}

/// Template context for api-card placeholder rendering.
struct CallContext<'a> {
    item_id: &'a ItemId,
    keyword: &'a str,
    quantity: u32,
    spec: Option<&'a SpecScope>,
}

impl CallContext<'_> {
    fn render(&self, template: &str) -> String {
        let (spec_name, spec_value) = self
            .spec
            .map(|s| (s.spec_name.as_str(), s.spec_value.as_str()))
            .unwrap_or(("", ""));
        template
            .replace("{item_id}", &self.item_id.0)
            .replace("{keyword}", self.keyword)
            .replace("{quantity}", &self.quantity.to_string())
            .replace("{spec_name}", spec_name)
            .replace("{spec_value}", spec_value)
    }
}

/// Maps purchase/keyword events to cards, honoring per-card delay,
/// spec scoping, and multi-quantity semantics.
pub struct DeliveryResolver {
    cards: DashMap<CardId, Arc<Card>>,
    rules: DashMap<AccountId, Vec<DeliveryRule>>,
    flags: DashMap<(AccountId, ItemId), ItemFlags>,
    http: reqwest::Client,
    api_retries: u32,
    low_stock_threshold: usize,
    alerts: Option<Arc<dyn AlertSink>>,
}

impl DeliveryResolver {
    pub fn new(api_retries: u32, low_stock_threshold: usize) -> Self {
        Self {
            cards: DashMap::new(),
            rules: DashMap::new(),
            flags: DashMap::new(),
            http: reqwest::Client::new(),
            api_retries,
            low_stock_threshold,
            alerts: None,
        }
    }

    /// Attaches a best-effort operator alert sink.
    pub fn with_alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Registers a card, failing loudly on invalid configuration.
    pub fn add_card(&self, card: Card) -> Result<(), VendraError> {
        card.validate()?;
        self.cards.insert(card.id, Arc::new(card));
        Ok(())
    }

    /// Registers a delivery rule. The referenced card must already exist:
    /// a dangling card reference is a configuration error surfaced at
    /// write time, not at purchase time.
    pub fn add_rule(&self, rule: DeliveryRule) -> Result<(), VendraError> {
        rule.validate()?;
        if !self.cards.contains_key(&rule.card_id) {
            return Err(VendraError::Config(format!(
                "delivery rule {} references missing card {}",
                rule.id.0, rule.card_id
            )));
        }
        self.rules
            .entry(rule.account_id.clone())
            .or_default()
            .push(rule);
        Ok(())
    }

    /// Sets per-(account, item) delivery flags.
    pub fn set_item_flags(&self, account_id: AccountId, item_id: ItemId, flags: ItemFlags) {
        self.flags.insert((account_id, item_id), flags);
    }

    /// Drops every rule and flag owned by the account.
    pub fn remove_account(&self, account_id: &AccountId) {
        self.rules.remove(account_id);
        self.flags.retain(|(a, _), _| a != account_id);
    }

    /// Resolves a purchase event into a delivery action, or `None` when no
    /// enabled rule matches the keyword.
    ///
    /// Spec-scoped rules take precedence over generic ones for the same
    /// keyword when both the card and the item are multi-spec.
    pub async fn resolve(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        keyword: &str,
        purchased_quantity: u32,
        spec: Option<&SpecScope>,
    ) -> Result<Option<DeliveryAction>, VendraError> {
        let flags = self
            .flags
            .get(&(account_id.clone(), item_id.clone()))
            .map(|f| *f)
            .unwrap_or_default();

        let Some((rule, card)) = self.select_rule(account_id, keyword, &flags, spec) else {
            return Ok(None);
        };

        // Effective draws scale with quantity only when the item opts in;
        // otherwise one delivery event draws the configured count once.
        let effective = if flags.multi_quantity_delivery {
            purchased_quantity.max(1) as usize * rule.delivery_count
        } else {
            rule.delivery_count
        };

        debug!(
            account_id = %account_id,
            item_id = %item_id,
            keyword,
            card = card.name.as_str(),
            kind = card.kind.kind_name(),
            effective_draws = effective,
            "delivery rule matched"
        );

        let ctx = CallContext {
            item_id,
            keyword,
            quantity: purchased_quantity,
            spec,
        };

        let (payload, stock) = match &card.kind {
            CardKind::Text { content } => {
                (DeliveryPayload::Text(content.clone()), StockStatus::Satisfied)
            }
            CardKind::Image { url } => (
                DeliveryPayload::Image { url: url.clone() },
                StockStatus::Satisfied,
            ),
            CardKind::Data { pool } => {
                let outcome = pool.claim(effective);
                let remaining = pool.remaining();
                if remaining <= self.low_stock_threshold {
                    self.alert(Alert::LowStock {
                        card_name: card.name.clone(),
                        remaining,
                        requested: effective,
                    })
                    .await;
                }
                match outcome {
                    DrawOutcome::Full(lines) => {
                        (DeliveryPayload::Lines(lines), StockStatus::Satisfied)
                    }
                    DrawOutcome::Partial { claimed, shortfall } => {
                        warn!(
                            card = card.name.as_str(),
                            delivered = claimed.len(),
                            shortfall,
                            "data pool under-delivered"
                        );
                        let delivered = claimed.len();
                        (
                            DeliveryPayload::Lines(claimed),
                            StockStatus::Short {
                                delivered,
                                requested: effective,
                            },
                        )
                    }
                    DrawOutcome::Exhausted => {
                        warn!(card = card.name.as_str(), "data pool exhausted");
                        (DeliveryPayload::Lines(Vec::new()), StockStatus::Exhausted)
                    }
                }
            }
            CardKind::Api(config) => {
                let body = self.call_api_card(&card.name, config, &ctx).await?;
                (DeliveryPayload::Text(body), StockStatus::Satisfied)
            }
        };

        let dispatch_at = (card.delay_seconds > 0)
            .then(|| Utc::now() + chrono::Duration::seconds(i64::from(card.delay_seconds)));

        info!(
            account_id = %account_id,
            card = card.name.as_str(),
            delayed = dispatch_at.is_some(),
            stock = ?stock,
            "delivery resolved"
        );

        Ok(Some(DeliveryAction {
            card_id: card.id,
            card_name: card.name.clone(),
            payload,
            dispatch_at,
            stock,
        }))
    }

    /// Picks the matching rule for a keyword: spec-scoped first when the
    /// item is multi-spec and a spec is known, then generic.
    fn select_rule(
        &self,
        account_id: &AccountId,
        keyword: &str,
        flags: &ItemFlags,
        spec: Option<&SpecScope>,
    ) -> Option<(DeliveryRule, Arc<Card>)> {
        let rules = self.rules.get(account_id)?;

        let candidates: Vec<(&DeliveryRule, Arc<Card>)> = rules
            .iter()
            .filter(|r| r.enabled && r.keyword == keyword)
            .filter_map(|r| {
                let card = self.cards.get(&r.card_id)?;
                card.enabled.then(|| (r, Arc::clone(&card)))
            })
            .collect();

        if flags.is_multi_spec
            && let Some(spec) = spec
            && let Some(hit) = candidates
                .iter()
                .find(|(_, card)| card.spec.as_ref() == Some(spec))
        {
            return Some((hit.0.clone(), Arc::clone(&hit.1)));
        }

        candidates
            .into_iter()
            .find(|(_, card)| card.spec.is_none())
            .map(|(r, card)| (r.clone(), card))
    }

    /// Issues the api-card call with bounded retries; the response body
    /// becomes the delivery payload.
    async fn call_api_card(
        &self,
        card_name: &str,
        config: &ApiCardConfig,
        ctx: &CallContext<'_>,
    ) -> Result<String, VendraError> {
        let url = ctx.render(&config.url);
        let timeout = Duration::from_secs(config.timeout_secs);
        let retries = config.retries.unwrap_or(self.api_retries);

        let mut last_error: Option<String> = None;

        for attempt in 0..=retries {
            if attempt > 0 {
                warn!(card = card_name, attempt, "retrying api card call");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut request = match config.method {
                ApiMethod::Get => {
                    let query: Vec<(String, String)> = config
                        .params
                        .iter()
                        .map(|(k, v)| (k.clone(), ctx.render(v)))
                        .collect();
                    self.http.get(&url).query(&query)
                }
                ApiMethod::Post => {
                    let body: serde_json::Map<String, serde_json::Value> = config
                        .params
                        .iter()
                        .map(|(k, v)| (k.clone(), serde_json::Value::String(ctx.render(v))))
                        .collect();
                    self.http.post(&url).json(&body)
                }
            };
            for (name, value) in &config.headers {
                request = request.header(name, value);
            }

            match request.timeout(timeout).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.text().await.map_err(|e| VendraError::Delivery {
                        message: format!("api card `{card_name}`: failed to read body: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
                Ok(response) => {
                    last_error = Some(format!("api returned {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(format!("request failed: {e}"));
                }
            }
        }

        let detail = last_error.unwrap_or_else(|| "unknown failure".to_string());
        self.alert(Alert::DeliveryFailure {
            card_name: card_name.to_string(),
            detail: detail.clone(),
        })
        .await;
        Err(VendraError::Delivery {
            message: format!("api card `{card_name}` failed after retries: {detail}"),
            source: None,
        })
    }

    async fn alert(&self, alert: Alert) {
        if let Some(sink) = &self.alerts {
            sink.notify(alert).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardId;
    use crate::pool::DataPool;
    use crate::rules::RuleId;
    use std::collections::BTreeMap;

    fn acct() -> AccountId {
        AccountId("acct-1".into())
    }

    fn item() -> ItemId {
        ItemId("ITEM1".into())
    }

    fn data_card(id: u64, name: &str, lines: usize, spec: Option<SpecScope>) -> Card {
        Card {
            id: CardId(id),
            name: name.into(),
            description: String::new(),
            enabled: true,
            delay_seconds: 0,
            spec,
            kind: CardKind::Data {
                pool: DataPool::new((0..lines).map(|i| format!("{name}-{i}")).collect()),
            },
        }
    }

    fn rule(id: u64, keyword: &str, card_id: u64, count: usize) -> DeliveryRule {
        DeliveryRule {
            id: RuleId(id),
            account_id: acct(),
            keyword: keyword.into(),
            card_id: CardId(card_id),
            delivery_count: count,
            enabled: true,
            description: String::new(),
        }
    }

    fn resolver() -> DeliveryResolver {
        DeliveryResolver::new(0, 0)
    }

    #[tokio::test]
    async fn no_matching_rule_resolves_to_none() {
        let resolver = resolver();
        let action = resolver
            .resolve(&acct(), &item(), "unknown", 1, None)
            .await
            .unwrap();
        assert!(action.is_none());
    }

    #[tokio::test]
    async fn disabled_rule_never_matches() {
        let resolver = resolver();
        resolver.add_card(data_card(1, "key", 5, None)).unwrap();
        let mut r = rule(1, "game", 1, 1);
        r.enabled = false;
        resolver.add_rule(r).unwrap();

        let action = resolver.resolve(&acct(), &item(), "game", 1, None).await.unwrap();
        assert!(action.is_none());
    }

    #[tokio::test]
    async fn dangling_card_reference_is_a_config_error() {
        let resolver = resolver();
        let err = resolver.add_rule(rule(1, "game", 99, 1)).unwrap_err();
        assert!(matches!(err, VendraError::Config(_)));
    }

    #[tokio::test]
    async fn full_satisfaction_draws_exactly_n_lines() {
        let resolver = resolver();
        resolver.add_card(data_card(1, "key", 5, None)).unwrap();
        resolver.add_rule(rule(1, "game", 1, 2)).unwrap();

        let action = resolver
            .resolve(&acct(), &item(), "game", 1, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action.stock, StockStatus::Satisfied);
        assert_eq!(
            action.payload,
            DeliveryPayload::Lines(vec!["key-0".into(), "key-1".into()])
        );
    }

    #[tokio::test]
    async fn partial_pool_surfaces_explicit_shortfall() {
        let resolver = resolver();
        resolver.add_card(data_card(1, "key", 2, None)).unwrap();
        resolver.add_rule(rule(1, "game", 1, 5)).unwrap();

        let action = resolver
            .resolve(&acct(), &item(), "game", 1, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            action.stock,
            StockStatus::Short {
                delivered: 2,
                requested: 5
            }
        );

        // A second event on the drained pool is fully unsatisfied.
        let action = resolver
            .resolve(&acct(), &item(), "game", 1, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action.stock, StockStatus::Exhausted);
        assert_eq!(action.payload, DeliveryPayload::Lines(vec![]));
    }

    #[tokio::test]
    async fn multi_quantity_scales_draws_only_when_enabled() {
        let resolver = resolver();
        resolver.add_card(data_card(1, "key", 10, None)).unwrap();
        resolver.add_rule(rule(1, "game", 1, 1)).unwrap();

        // Flag off: a 3-unit purchase still triggers a single draw.
        let action = resolver
            .resolve(&acct(), &item(), "game", 3, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action.payload, DeliveryPayload::Lines(vec!["key-0".into()]));

        // Flag on: a 3-unit purchase draws 3 lines.
        resolver.set_item_flags(
            acct(),
            item(),
            ItemFlags {
                is_multi_spec: false,
                multi_quantity_delivery: true,
            },
        );
        let action = resolver
            .resolve(&acct(), &item(), "game", 3, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            action.payload,
            DeliveryPayload::Lines(vec!["key-1".into(), "key-2".into(), "key-3".into()])
        );
    }

    #[tokio::test]
    async fn spec_scoped_card_beats_generic_for_same_keyword() {
        let spec = SpecScope {
            spec_name: "edition".into(),
            spec_value: "deluxe".into(),
        };
        let resolver = resolver();
        resolver.add_card(data_card(1, "standard", 5, None)).unwrap();
        resolver
            .add_card(data_card(2, "deluxe", 5, Some(spec.clone())))
            .unwrap();
        resolver.add_rule(rule(1, "game", 1, 1)).unwrap();
        resolver.add_rule(rule(2, "game", 2, 1)).unwrap();
        resolver.set_item_flags(
            acct(),
            item(),
            ItemFlags {
                is_multi_spec: true,
                multi_quantity_delivery: false,
            },
        );

        let action = resolver
            .resolve(&acct(), &item(), "game", 1, Some(&spec))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action.card_name, "deluxe");

        // Without a spec in the event, the generic card applies.
        let action = resolver
            .resolve(&acct(), &item(), "game", 1, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action.card_name, "standard");
    }

    #[tokio::test]
    async fn delay_produces_scheduled_dispatch_time() {
        let resolver = resolver();
        let mut card = data_card(1, "key", 5, None);
        card.delay_seconds = 30;
        resolver.add_card(card).unwrap();
        resolver.add_rule(rule(1, "game", 1, 1)).unwrap();

        let before = Utc::now();
        let action = resolver
            .resolve(&acct(), &item(), "game", 1, None)
            .await
            .unwrap()
            .unwrap();
        let at = action.dispatch_at.expect("delayed card must be scheduled");
        assert!(at >= before + chrono::Duration::seconds(29));
    }

    #[tokio::test]
    async fn text_card_is_never_exhausted() {
        let resolver = resolver();
        resolver
            .add_card(Card {
                id: CardId(1),
                name: "thanks".into(),
                description: String::new(),
                enabled: true,
                delay_seconds: 0,
                spec: None,
                kind: CardKind::Text {
                    content: "enjoy your purchase".into(),
                },
            })
            .unwrap();
        resolver.add_rule(rule(1, "sticker", 1, 1)).unwrap();

        for _ in 0..3 {
            let action = resolver
                .resolve(&acct(), &item(), "sticker", 1, None)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(action.stock, StockStatus::Satisfied);
            assert_eq!(
                action.payload,
                DeliveryPayload::Text("enjoy your purchase".into())
            );
        }
    }

    mod api_cards {
        use super::*;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn api_card(id: u64, url: String, method: ApiMethod) -> Card {
            let mut params = BTreeMap::new();
            params.insert("order".into(), "{item_id}-{quantity}".into());
            Card {
                id: CardId(id),
                name: "remote".into(),
                description: String::new(),
                enabled: true,
                delay_seconds: 0,
                spec: None,
                kind: CardKind::Api(ApiCardConfig {
                    url,
                    method,
                    headers: BTreeMap::new(),
                    params,
                    timeout_secs: 5,
                    retries: None,
                }),
            }
        }

        #[tokio::test]
        async fn api_card_response_body_becomes_payload() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/issue"))
                .and(query_param("order", "ITEM1-2"))
                .respond_with(ResponseTemplate::new(200).set_body_string("CODE-XYZ"))
                .mount(&server)
                .await;

            let resolver = resolver();
            resolver
                .add_card(api_card(1, format!("{}/issue", server.uri()), ApiMethod::Get))
                .unwrap();
            resolver.add_rule(rule(1, "game", 1, 1)).unwrap();

            let action = resolver
                .resolve(&acct(), &item(), "game", 2, None)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(action.payload, DeliveryPayload::Text("CODE-XYZ".into()));
        }

        #[tokio::test]
        async fn api_card_retries_then_fails_as_delivery_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/issue"))
                .respond_with(ResponseTemplate::new(500))
                .expect(2) // initial call + one retry
                .mount(&server)
                .await;

            let resolver = DeliveryResolver::new(1, 0);
            resolver
                .add_card(api_card(1, format!("{}/issue", server.uri()), ApiMethod::Get))
                .unwrap();
            resolver.add_rule(rule(1, "game", 1, 1)).unwrap();

            let err = resolver
                .resolve(&acct(), &item(), "game", 1, None)
                .await
                .unwrap_err();
            assert!(matches!(err, VendraError::Delivery { .. }));
        }
    }
}
