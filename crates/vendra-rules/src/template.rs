// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder rendering for configured reply text.
//!
//! Reply content may embed `{send_user_id}`, `{send_user_name}`, and
//! `{send_message}` placeholders filled from the inbound message. Unknown
//! placeholders are left untouched, so a malformed template degrades to
//! its raw content instead of failing the reply.

use vendra_core::types::InboundMessage;

/// Renders the known placeholders of `template` from `msg`.
pub fn render_reply(template: &str, msg: &InboundMessage) -> String {
    template
        .replace("{send_user_id}", &msg.buyer_id.0)
        .replace("{send_user_name}", &msg.buyer_name)
        .replace("{send_message}", &msg.text)
}
