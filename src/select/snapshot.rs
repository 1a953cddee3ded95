// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Instant;

use crate::dom::{DomRange, NodeId};

use super::{Located, LocatedTarget};

/// Which replacement strategy family applies to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    PlainRange,
    InputRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotTarget {
    /// Byte offsets into the owner field's value at capture time. May go
    /// stale if the value changes before replacement; tolerated there.
    Input { bounds: (usize, usize) },
    /// Range cloned at capture time so later page mutation cannot move the
    /// recorded boundaries (though it can invalidate them).
    Plain { range: DomRange },
}

/// A frozen description of what text is selected, where, and how to
/// re-locate it for replacement.
///
/// `text` is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    text: String,
    owner: NodeId,
    target: SnapshotTarget,
    captured_at: Instant,
}

impl SelectionSnapshot {
    fn from_located(located: Located) -> Self {
        let target = match located.target {
            LocatedTarget::Input { bounds } => SnapshotTarget::Input { bounds },
            LocatedTarget::Plain { range } => SnapshotTarget::Plain { range },
        };
        Self {
            text: located.text,
            owner: located.owner,
            target,
            captured_at: Instant::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn target(&self) -> SnapshotTarget {
        self.target
    }

    pub fn kind(&self) -> SelectionKind {
        match self.target {
            SnapshotTarget::Input { .. } => SelectionKind::InputRange,
            SnapshotTarget::Plain { .. } => SelectionKind::PlainRange,
        }
    }

    /// Capture time, for staleness diagnostics only. Nothing enforces an
    /// expiry.
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }
}

/// Single-slot snapshot store: capturing always replaces the previous
/// snapshot, never stacks.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<SelectionSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, located: Located) -> &SelectionSnapshot {
        self.current.insert(SelectionSnapshot::from_located(located))
    }

    pub fn current(&self) -> Option<&SelectionSnapshot> {
        self.current.as_ref()
    }

    /// Whether the stored snapshot carries exactly this text. Used to treat
    /// redundant selection-change events for the same logical selection as
    /// no-ops.
    pub fn holds_text(&self, text: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|snapshot| snapshot.text == text)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
