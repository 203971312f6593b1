// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the engine's external collaborators.
//!
//! All collaborators extend the [`Adapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod ai;
pub mod alert;
pub mod scheduler;

pub use adapter::Adapter;
pub use ai::AiProvider;
pub use alert::AlertSink;
pub use scheduler::DelayScheduler;
