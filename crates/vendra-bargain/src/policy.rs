// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-discount policy arithmetic.
//!
//! Both caps apply simultaneously: an offer must satisfy
//! `percent <= max_discount_percent` AND `amount <= max_discount_amount`,
//! with the most restrictive cap winning. Out-of-cap proposals are clamped,
//! never rejected outright (bounded concession, not an unbounded one).

use serde::{Deserialize, Serialize};

use crate::settings::AiSettings;

/// A concession offer: discount percent and absolute amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub percent: f64,
    pub amount: f64,
}

impl Offer {
    /// The zero concession.
    pub const NONE: Offer = Offer {
        percent: 0.0,
        amount: 0.0,
    };
}

/// Clamps a proposed offer to both caps for an item priced `price`.
///
/// When `price` is positive the percent and amount dimensions are coupled:
/// the final amount is the minimum of the amount cap and the amount implied
/// by the percent cap, and the final percent is recomputed from it. With an
/// unknown price (zero), each dimension is clamped independently.
pub fn clamp_offer(proposed: Offer, price: f64, settings: &AiSettings) -> Offer {
    let percent = proposed.percent.clamp(0.0, settings.max_discount_percent);
    let amount = proposed.amount.clamp(0.0, settings.max_discount_amount);

    if price > 0.0 {
        let implied_by_percent = price * percent / 100.0;
        let final_amount = amount.min(implied_by_percent);
        Offer {
            percent: final_amount / price * 100.0,
            amount: final_amount,
        }
    } else {
        Offer { percent, amount }
    }
}
