// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Replacement engine.
//!
//! Replaces a snapshotted selection with new text. No single technique
//! reliably replaces arbitrary selected text across the editable surfaces
//! real pages use, so plain-content replacement runs a prioritized cascade of
//! strategies and stops at the first success; input fields recompute their
//! offsets through a shorter fallback ladder. Every attempt is recorded in
//! the result and traced, so callers and tests can see which tier fired.

mod input;
mod plain;

use std::fmt;

use crate::dom::Document;
use crate::select::{SelectionKind, SelectionSnapshot};

/// Traversal depth bound for the node-walk tier, guarding against runaway
/// cost on pathological trees.
pub const MAX_WALK_DEPTH: usize = 64;

/// Identifies one replacement technique, least to most invasive within its
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Re-establish the cloned range and splice a text node into it.
    RangeSplice,
    /// First-occurrence replace in serialized inner content; only fires for
    /// owners whose children carry no markup.
    MarkupSubstring,
    /// First-occurrence replace in flattened text content; collapses child
    /// markup like a `textContent` assignment.
    TextSubstring,
    /// Bounded depth-first walk splitting the first text node containing the
    /// original text.
    NodeWalk,
    /// Splice the input value at the captured offsets.
    InputOffsets,
    /// Splice at the first verbatim occurrence of the captured text in the
    /// current value.
    InputSearch,
    /// Replace the entire input value; the degraded last resort.
    InputFullValue,
}

impl Strategy {
    pub fn id(&self) -> &'static str {
        match self {
            Self::RangeSplice => "range-splice",
            Self::MarkupSubstring => "markup-substring",
            Self::TextSubstring => "text-substring",
            Self::NodeWalk => "node-walk",
            Self::InputOffsets => "input-offsets",
            Self::InputSearch => "input-search",
            Self::InputFullValue => "input-full-value",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Applied,
    Miss,
}

/// One cascade step: which strategy ran and whether it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub outcome: AttemptOutcome,
}

/// Successful replacement: the strategy that fired plus the full attempt
/// trail leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    strategy: Strategy,
    attempts: Vec<Attempt>,
}

impl Replaced {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Whether the engine fell back to replacing the whole input value
    /// instead of the captured span.
    pub fn degraded(&self) -> bool {
        self.strategy == Strategy::InputFullValue
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    /// No strategy matched. The snapshot is likely stale; retrying with the
    /// same snapshot would fail identically.
    NotFound { attempts: Vec<Attempt> },
}

impl ReplaceError {
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::NotFound { attempts } => attempts,
        }
    }
}

impl fmt::Display for ReplaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { attempts } => {
                write!(f, "no replacement strategy matched (attempts={})", attempts.len())
            }
        }
    }
}

impl std::error::Error for ReplaceError {}

/// Replaces the snapshotted span with `new_text`, mutating the document and
/// emitting the synthetic event sequence host frameworks expect from a real
/// edit.
pub fn replace(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Result<Replaced, ReplaceError> {
    let result = match snapshot.kind() {
        SelectionKind::InputRange => input::replace_in_input(doc, snapshot, new_text),
        SelectionKind::PlainRange => plain::replace_in_plain(doc, snapshot, new_text),
    };
    match &result {
        Ok(replaced) => {
            tracing::info!(
                strategy = replaced.strategy().id(),
                attempts = replaced.attempts().len(),
                "replacement applied"
            );
        }
        Err(err) => {
            tracing::warn!(attempts = err.attempts().len(), "replacement found no target");
        }
    }
    result
}

fn record(attempts: &mut Vec<Attempt>, strategy: Strategy, outcome: AttemptOutcome) {
    tracing::debug!(
        strategy = strategy.id(),
        outcome = match outcome {
            AttemptOutcome::Applied => "applied",
            AttemptOutcome::Miss => "miss",
        },
        "replacement attempt"
    );
    attempts.push(Attempt { strategy, outcome });
}

#[cfg(test)]
mod tests;
