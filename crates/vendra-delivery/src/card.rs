// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery card templates.
//!
//! A card is one of four kinds: fixed text, a one-time-use data pool, an
//! outbound API call whose response becomes the payload, or a static image.
//! Each kind is a structured variant so the required fields per kind are
//! enforced by the type, not by runtime key lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vendra_core::VendraError;

use crate::pool::DataPool;

/// Unique identifier for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A sellable-variant scope: a card bound to one (spec name, spec value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecScope {
    pub spec_name: String,
    pub spec_value: String,
}

/// HTTP method for api-type cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
    Get,
    Post,
}

/// Configuration of an api-type card's outbound call.
///
/// `url` and `params` values may embed `{item_id}`, `{keyword}`,
/// `{quantity}`, `{spec_name}`, and `{spec_value}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCardConfig {
    pub url: String,
    pub method: ApiMethod,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    pub timeout_secs: u64,
    /// Per-card retry override; the resolver's configured retry count
    /// applies when unset.
    #[serde(default)]
    pub retries: Option<u32>,
}

/// The payload-bearing part of a card.
#[derive(Debug)]
pub enum CardKind {
    /// A single fixed string, never exhausted.
    Text { content: String },
    /// A pool of discrete lines, each consumable at most once.
    Data { pool: DataPool },
    /// An outbound HTTP call whose response body becomes the payload.
    Api(ApiCardConfig),
    /// A single static image, never exhausted.
    Image { url: String },
}

impl CardKind {
    /// Kind name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CardKind::Text { .. } => "text",
            CardKind::Data { .. } => "data",
            CardKind::Api(_) => "api",
            CardKind::Image { .. } => "image",
        }
    }
}

/// A delivery template dispatched upon a purchase-triggering keyword.
#[derive(Debug)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Deliveries are scheduled, not sent inline, when positive.
    pub delay_seconds: u32,
    /// Present when the card is scoped to one product variant.
    pub spec: Option<SpecScope>,
    pub kind: CardKind,
}

impl Card {
    /// Validates the hard invariants that must fail loudly at
    /// configuration-load time, never at message-processing time.
    pub fn validate(&self) -> Result<(), VendraError> {
        if self.name.trim().is_empty() {
            return Err(VendraError::Config(format!(
                "card {} has an empty name",
                self.id
            )));
        }
        if let Some(spec) = &self.spec
            && (spec.spec_name.trim().is_empty() || spec.spec_value.trim().is_empty())
        {
            return Err(VendraError::Config(format!(
                "multi-spec card `{}` must carry both spec name and spec value",
                self.name
            )));
        }
        match &self.kind {
            CardKind::Text { content } if content.trim().is_empty() => {
                Err(VendraError::Config(format!(
                    "text card `{}` has no content",
                    self.name
                )))
            }
            CardKind::Data { pool } if pool.remaining() == 0 => {
                Err(VendraError::Config(format!(
                    "data card `{}` was loaded with an empty pool",
                    self.name
                )))
            }
            CardKind::Api(config) if config.url.trim().is_empty() => {
                Err(VendraError::Config(format!(
                    "api card `{}` has no URL",
                    self.name
                )))
            }
            CardKind::Api(config) if config.timeout_secs == 0 => {
                Err(VendraError::Config(format!(
                    "api card `{}` must have a positive timeout",
                    self.name
                )))
            }
            CardKind::Image { url } if url.trim().is_empty() => {
                Err(VendraError::Config(format!(
                    "image card `{}` has no image URL",
                    self.name
                )))
            }
            _ => Ok(()),
        }
    }
}
