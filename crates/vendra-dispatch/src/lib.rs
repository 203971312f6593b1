// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message dispatch for Vendra: the account registry and the
//! priority-ordered reply chain.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::MatchDispatcher;
pub use registry::AccountRegistry;
