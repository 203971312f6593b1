// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for negotiation turns.
//!
//! The system message stacks: operator custom prompts, the seller-assistant
//! role, the offer-marker protocol, and the concession envelope for this
//! turn (remaining caps and rounds, or the no-further-discount instruction
//! once the session is concluded).

use vendra_core::types::{ChatMessage, ItemSnapshot};

use crate::policy::Offer;
use crate::session::{NegotiationState, Session};
use crate::settings::AiSettings;

/// Builds the message list for one negotiation turn.
pub fn build_messages(
    settings: &AiSettings,
    item: Option<&ItemSnapshot>,
    session: &Session,
    buyer_message: &str,
) -> Vec<ChatMessage> {
    let mut system = String::new();

    if !settings.custom_prompts.is_empty() {
        system.push_str(&settings.custom_prompts);
        system.push_str("\n\n");
    }

    system.push_str(
        "You are a seller's assistant answering a buyer in a second-hand \
         marketplace chat. Reply in the buyer's language, briefly and politely.\n",
    );

    match session.state {
        NegotiationState::Concluded => {
            system.push_str(
                "The negotiation is closed: you must NOT offer any further \
                 discount or lower the price. Restate the current offer as final.\n",
            );
        }
        _ => {
            system.push_str(&format!(
                "You may concede a discount of at most {:.2}% and at most {:.2} \
                 in absolute amount. {} concession round(s) remain. If and only \
                 if your reply concedes a discount, append the exact marker \
                 [[offer percent=P amount=A]] at the end, where P and A are the \
                 total discount you are now offering.\n",
                settings.max_discount_percent,
                settings.max_discount_amount,
                settings.max_bargain_rounds.saturating_sub(session.rounds_used),
            ));
        }
    }

    if session.current_offer != Offer::NONE {
        system.push_str(&format!(
            "You have already offered a {:.2}% discount ({:.2} off). Never \
             retract an offer already made.\n",
            session.current_offer.percent, session.current_offer.amount,
        ));
    }

    let mut messages = vec![ChatMessage::system(system)];

    if let Some(item) = item {
        messages.push(ChatMessage::user(format!(
            "Item context:\ntitle: {}\nprice: {:.2}\ndescription: {}",
            item.title, item.price, item.description
        )));
    }

    messages.push(ChatMessage::user(buyer_message.to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendra_core::types::ItemId;

    fn item() -> ItemSnapshot {
        ItemSnapshot {
            item_id: ItemId("I1".into()),
            title: "mechanical keyboard".into(),
            price: 199.0,
            description: "87 keys, brown switches".into(),
        }
    }

    #[test]
    fn custom_prompts_come_first_in_system_message() {
        let settings = AiSettings {
            custom_prompts: "Always mention free shipping.".into(),
            ..AiSettings::default()
        };
        let messages = build_messages(&settings, None, &Session::new(), "cheaper?");
        assert!(messages[0].content.starts_with("Always mention free shipping."));
    }

    #[test]
    fn negotiating_turn_includes_caps_and_marker_protocol() {
        let messages =
            build_messages(&AiSettings::default(), Some(&item()), &Session::new(), "50 ok?");
        let system = &messages[0].content;
        assert!(system.contains("10.00%"));
        assert!(system.contains("100.00"));
        assert!(system.contains("[[offer percent=P amount=A]]"));
        // Item context travels as its own message before the buyer's.
        assert!(messages[1].content.contains("mechanical keyboard"));
        assert_eq!(messages[2].content, "50 ok?");
    }

    #[test]
    fn concluded_turn_forbids_discounts() {
        let mut session = Session::new();
        session.state = NegotiationState::Concluded;
        let messages = build_messages(&AiSettings::default(), None, &session, "lower?");
        let system = &messages[0].content;
        assert!(system.contains("NOT offer any further"));
        assert!(!system.contains("[[offer percent=P"));
    }
}
