// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine-readable offer marker embedded in provider replies.
//!
//! The provider is instructed to append `[[offer percent=P amount=A]]`
//! whenever its reply concedes a discount. The orchestrator parses the
//! marker, applies the bounded-discount policy, and strips it so it never
//! leaks into buyer-visible text. A reply without a marker is a turn with
//! no concession.

use std::sync::LazyLock;

use regex::Regex;

use crate::policy::Offer;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[offer\s+percent=([0-9]+(?:\.[0-9]+)?)\s+amount=([0-9]+(?:\.[0-9]+)?)\]\]")
        .unwrap_or_else(|e| unreachable!("invalid offer marker regex: {e}"))
});

/// Extracts the first offer marker and returns the buyer-visible text with
/// every marker removed.
pub fn extract_offer(text: &str) -> (Option<Offer>, String) {
    let offer = MARKER_RE.captures(text).and_then(|caps| {
        let percent = caps.get(1)?.as_str().parse().ok()?;
        let amount = caps.get(2)?.as_str().parse().ok()?;
        Some(Offer { percent, amount })
    });

    let cleaned = MARKER_RE.replace_all(text, "").trim().to_string();
    (offer, cleaned)
}
