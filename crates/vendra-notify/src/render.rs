// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert-to-text rendering shared by every channel transport.

use vendra_core::types::Alert;

/// Short headline for the alert, used as a push title or mail subject.
pub fn title(alert: &Alert) -> String {
    match alert {
        Alert::AiFailure { account_id, .. } => {
            format!("AI reply failed for account {account_id}")
        }
        Alert::LowStock { card_name, .. } => format!("Card `{card_name}` is low on stock"),
        Alert::DeliveryFailure { card_name, .. } => {
            format!("Delivery via card `{card_name}` failed")
        }
    }
}

/// One-paragraph body with the alert's details.
pub fn body(alert: &Alert) -> String {
    match alert {
        Alert::AiFailure {
            account_id,
            conversation_id,
            detail,
        } => format!(
            "The AI provider call failed in conversation {conversation_id} \
             (account {account_id}); the buyer received the fallback reply. {detail}"
        ),
        Alert::LowStock {
            card_name,
            remaining,
            requested,
        } => format!(
            "Data card `{card_name}` has {remaining} line(s) left after a request \
             for {requested}. Restock it before the pool runs dry."
        ),
        Alert::DeliveryFailure { card_name, detail } => {
            format!("Api card `{card_name}` failed after all retries: {detail}")
        }
    }
}
