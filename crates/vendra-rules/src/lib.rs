// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule indexes for the Vendra matching engine.
//!
//! Three read-mostly stores consulted by the dispatcher, maintained by the
//! admin console: keyword rules, per-item override replies, and the default
//! reply with its reply-once records.

pub mod default_reply;
pub mod item_reply;
pub mod keyword;
pub mod template;

pub use default_reply::{DefaultReplyGate, DefaultReplySetting};
pub use item_reply::ItemReplyIndex;
pub use keyword::{KeywordIndex, KeywordRule};
pub use template::render_reply;
