// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation negotiation state.

use crate::policy::Offer;

/// States in the negotiation FSM.
///
/// `Concluded` is terminal per conversation; a fresh conversation id starts
/// over at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// No message seen yet for this conversation.
    Idle,
    /// Concessions may still be offered.
    Negotiating,
    /// Round budget exhausted; replies may no longer lower the price.
    Concluded,
}

impl std::fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationState::Idle => write!(f, "idle"),
            NegotiationState::Negotiating => write!(f, "negotiating"),
            NegotiationState::Concluded => write!(f, "concluded"),
        }
    }
}

/// Running concession state for one (account, conversation).
#[derive(Debug, Clone)]
pub struct Session {
    pub state: NegotiationState,
    /// Concession turns used so far (turns without a concession don't count).
    pub rounds_used: u32,
    /// Best offer extended so far.
    pub current_offer: Offer,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: NegotiationState::Idle,
            rounds_used: 0,
            current_offer: Offer::NONE,
        }
    }

    /// Records a concession turn against the round budget of `max_rounds`.
    /// Transitions to `Concluded` when the budget is exhausted.
    pub fn record_concession(&mut self, offer: Offer, max_rounds: u32) {
        self.rounds_used += 1;
        self.current_offer = offer;
        if self.rounds_used >= max_rounds {
            self.state = NegotiationState::Concluded;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
