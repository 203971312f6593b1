// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator notification channels for Vendra.
//!
//! Alerts raised by the engine (AI failures, low stock, delivery failures)
//! are fanned out to the configured HTTP channels on a best-effort basis.

pub mod render;
pub mod sink;

pub use sink::HttpAlertSink;
