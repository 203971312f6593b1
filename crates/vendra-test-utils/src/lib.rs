// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Vendra workspace.

pub mod mock_ai;

pub use mock_ai::MockAi;
