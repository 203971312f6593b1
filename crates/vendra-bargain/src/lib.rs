// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI negotiation orchestration for the Vendra matching engine.
//!
//! Applies bounded-discount business rules (dual caps, round budgets) on
//! top of an external chat-completion provider, keeping one small FSM per
//! (account, conversation).

pub mod marker;
pub mod orchestrator;
pub mod policy;
pub mod prompt;
pub mod session;
pub mod settings;

pub use orchestrator::{AiReplyOrchestrator, ProviderFactory};
pub use policy::{Offer, clamp_offer};
pub use session::{NegotiationState, Session};
pub use settings::AiSettings;
