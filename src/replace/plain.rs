// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use memchr::memmem;

use crate::dom::{Document, DomRange, NodeId, SyntheticEventKind};
use crate::select::{SelectionSnapshot, SnapshotTarget};

use super::{record, AttemptOutcome, Replaced, ReplaceError, Strategy, MAX_WALK_DEPTH};

/// Common signature shared by all plain-content strategy tiers. `Some(())`
/// means the tier fired and the document was mutated; `None` means it did
/// not apply and left the document untouched.
type Tier = fn(&mut Document, &SelectionSnapshot, &str) -> Option<()>;

const TIERS: [(Strategy, Tier); 4] = [
    (Strategy::RangeSplice, range_splice),
    (Strategy::MarkupSubstring, markup_substring),
    (Strategy::TextSubstring, text_substring),
    (Strategy::NodeWalk, node_walk),
];

pub(super) fn replace_in_plain(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Result<Replaced, ReplaceError> {
    let mut attempts = Vec::new();
    for (strategy, tier) in TIERS {
        if tier(doc, snapshot, new_text).is_some() {
            record(&mut attempts, strategy, AttemptOutcome::Applied);
            notify_editable_owner(doc, snapshot.owner());
            return Ok(Replaced { strategy, attempts });
        }
        record(&mut attempts, strategy, AttemptOutcome::Miss);
    }
    Err(ReplaceError::NotFound { attempts })
}

/// Editors listening for IME-style composition need a composition-end after
/// scripted edits; plain frameworks watch input/change. Only fires when the
/// owner itself is an editable surface.
fn notify_editable_owner(doc: &mut Document, owner: NodeId) {
    let Some(data) = doc.element(owner) else {
        return;
    };
    if data.editable() || data.input().is_some() {
        let _ = doc.set_focus(Some(owner));
        doc.emit(owner, SyntheticEventKind::Input);
        doc.emit(owner, SyntheticEventKind::Change);
        doc.emit(owner, SyntheticEventKind::CompositionEnd);
    }
}

/// Tier 1: re-establish the cloned range as the active selection, delete its
/// contents, and insert a text node holding the replacement. Misses when the
/// range has gone stale.
pub(super) fn range_splice(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Option<()> {
    let SnapshotTarget::Plain { range } = snapshot.target() else {
        return None;
    };
    if !doc.range_is_attached(&range) {
        return None;
    }
    let covered = doc.range_text(&range)?;
    if covered.is_empty() {
        return None;
    }
    doc.set_selection(range);
    let caret = doc.delete_range_contents(&range)?;
    let inserted = doc.insert_text_at(caret, new_text)?;
    doc.set_selection(DomRange::collapsed(inserted, new_text.len()));
    Some(())
}

/// Tier 2: first-occurrence replace over the owner's serialized inner
/// content. Restricted to owners whose children carry no element markup;
/// replacing across tag boundaries would corrupt structure.
pub(super) fn markup_substring(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Option<()> {
    let owner = snapshot.owner();
    doc_alive(doc, owner)?;
    if !doc.has_only_text_children(owner) {
        return None;
    }
    splice_flattened(doc, owner, snapshot.text(), new_text)
}

/// Tier 3: first-occurrence replace over the owner's flattened text content.
/// Collapses child markup, exactly like assigning `textContent`.
pub(super) fn text_substring(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Option<()> {
    let owner = snapshot.owner();
    doc_alive(doc, owner)?;
    splice_flattened(doc, owner, snapshot.text(), new_text)
}

/// Tier 4: bounded depth-first walk over the owner's text nodes; the first
/// node containing the original text is split into before/new/after nodes.
pub(super) fn node_walk(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Option<()> {
    let owner = snapshot.owner();
    doc_alive(doc, owner)?;
    let needle = snapshot.text();
    for node in doc.text_nodes_bounded(owner, MAX_WALK_DEPTH) {
        let content = doc.text(node)?.content().to_owned();
        let Some(index) = memmem::find(content.as_bytes(), needle.as_bytes()) else {
            continue;
        };
        let parent = doc.parent(node)?;
        let before = &content[..index];
        let after = &content[index + needle.len()..];

        let inserted = doc.create_text(new_text);
        if !before.is_empty() {
            let lead = doc.create_text(before.to_owned());
            doc.insert_before(parent, lead, node).ok()?;
        }
        doc.insert_before(parent, inserted, node).ok()?;
        if !after.is_empty() {
            let tail = doc.create_text(after.to_owned());
            doc.insert_before(parent, tail, node).ok()?;
        }
        doc.remove(node).ok()?;
        doc.set_selection(DomRange::collapsed(inserted, new_text.len()));
        return Some(());
    }
    None
}

fn doc_alive(doc: &Document, owner: NodeId) -> Option<NodeId> {
    doc.element(owner)?;
    Some(owner)
}

fn splice_flattened(
    doc: &mut Document,
    owner: NodeId,
    needle: &str,
    new_text: &str,
) -> Option<()> {
    let content = doc.text_content(owner)?;
    let index = memmem::find(content.as_bytes(), needle.as_bytes())?;
    let mut next = String::with_capacity(content.len() - needle.len() + new_text.len());
    next.push_str(&content[..index]);
    next.push_str(new_text);
    next.push_str(&content[index + needle.len()..]);
    let node = doc.set_text_children(owner, next).ok()?;
    doc.set_selection(DomRange::collapsed(node, index + new_text.len()));
    Some(())
}
