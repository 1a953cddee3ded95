// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Selection location and snapshotting.
//!
//! [`locate`] inspects the document's focus and selection state and answers
//! "what text is selected, and who owns it". [`SnapshotStore`] freezes a
//! located selection into a single-slot record that survives the latency of
//! the rewrite round trip.

pub mod snapshot;

use crate::dom::{Document, DomRange, NodeId};

pub use snapshot::{SelectionKind, SelectionSnapshot, SnapshotStore, SnapshotTarget};

/// A located selection: trimmed text, the owning element, and how to address
/// the span for replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub(crate) text: String,
    pub(crate) owner: NodeId,
    pub(crate) target: LocatedTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatedTarget {
    /// Character span inside the owner input field's value.
    Input { bounds: (usize, usize) },
    /// Cloned range over text nodes.
    Plain { range: DomRange },
}

impl Located {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn kind(&self) -> SelectionKind {
        match self.target {
            LocatedTarget::Input { .. } => SelectionKind::InputRange,
            LocatedTarget::Plain { .. } => SelectionKind::PlainRange,
        }
    }
}

/// Determines the active text selection, if any.
///
/// Priority: a non-collapsed internal selection of the *focused* input field
/// always wins over the page-level selection; a leftover page selection
/// elsewhere must not shadow what the user is doing inside the field. Text is
/// trimmed before emptiness is judged, so whitespace-only selections locate
/// nothing.
pub fn locate(doc: &Document) -> Option<Located> {
    if let Some(located) = locate_in_focused_input(doc) {
        return Some(located);
    }
    locate_in_page_selection(doc)
}

fn locate_in_focused_input(doc: &Document) -> Option<Located> {
    let focused = doc.focused()?;
    let input = doc.input_state(focused)?;
    let (start, end) = input.selection()?;
    if start == end {
        return None;
    }
    let text = input.value().get(start..end)?.trim();
    if text.is_empty() {
        return None;
    }
    Some(Located {
        text: text.to_owned(),
        owner: focused,
        target: LocatedTarget::Input {
            bounds: (start, end),
        },
    })
}

fn locate_in_page_selection(doc: &Document) -> Option<Located> {
    let range = doc.selection()?;
    let text = doc.range_text(&range)?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let owner = doc.range_owner_element(&range)?;
    Some(Located {
        text: text.to_owned(),
        owner,
        target: LocatedTarget::Plain { range },
    })
}
