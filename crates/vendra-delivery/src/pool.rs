// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time-use data pools backing data-type cards.
//!
//! A claim is a single "check remaining, take N, shrink" critical section,
//! so concurrent deliveries for the same card can never be handed the same
//! line twice. The lock is a plain std mutex: claims never await.

use std::sync::Mutex;

/// Outcome of a pool claim, distinguishing the three stock cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// All requested lines were claimed.
    Full(Vec<String>),
    /// Fewer lines remained than requested; everything left was claimed.
    Partial {
        claimed: Vec<String>,
        shortfall: usize,
    },
    /// The pool was already empty.
    Exhausted,
}

impl DrawOutcome {
    /// The claimed lines, empty when exhausted.
    pub fn lines(&self) -> &[String] {
        match self {
            DrawOutcome::Full(lines) => lines,
            DrawOutcome::Partial { claimed, .. } => claimed,
            DrawOutcome::Exhausted => &[],
        }
    }
}

/// A pool of discrete lines, each consumable at most once.
#[derive(Debug)]
pub struct DataPool {
    lines: Mutex<Vec<String>>,
}

impl DataPool {
    /// Builds a pool from its lines, dropping blank entries.
    pub fn new(lines: Vec<String>) -> Self {
        let lines = lines
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self {
            lines: Mutex::new(lines),
        }
    }

    /// Builds a pool from newline-separated content, the admin console's
    /// storage format.
    pub fn from_content(content: &str) -> Self {
        Self::new(content.lines().map(String::from).collect())
    }

    /// Atomically claims up to `count` lines from the front of the pool.
    pub fn claim(&self, count: usize) -> DrawOutcome {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if lines.is_empty() {
            return DrawOutcome::Exhausted;
        }
        if count == 0 {
            return DrawOutcome::Full(Vec::new());
        }

        let take = count.min(lines.len());
        let claimed: Vec<String> = lines.drain(..take).collect();

        if take < count {
            DrawOutcome::Partial {
                claimed,
                shortfall: count - take,
            }
        } else {
            DrawOutcome::Full(claimed)
        }
    }

    /// Restocks the pool by appending lines (admin action).
    pub fn restock(&self, new_lines: Vec<String>) {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.extend(
            new_lines
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        );
    }

    /// Remaining undelivered lines.
    pub fn remaining(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
