// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::dom::{Document, DomRange, NodeId, SyntheticEventKind};
use crate::select::{locate, Located, LocatedTarget, SelectionSnapshot, SnapshotStore};

use super::{plain, replace, AttemptOutcome, ReplaceError, Strategy};

fn plain_snapshot(text: &str, owner: NodeId, range: DomRange) -> SelectionSnapshot {
    let mut store = SnapshotStore::new();
    store
        .capture(Located {
            text: text.to_owned(),
            owner,
            target: LocatedTarget::Plain { range },
        })
        .clone()
}

fn input_snapshot(text: &str, owner: NodeId, bounds: (usize, usize)) -> SelectionSnapshot {
    let mut store = SnapshotStore::new();
    store
        .capture(Located {
            text: text.to_owned(),
            owner,
            target: LocatedTarget::Input { bounds },
        })
        .clone()
}

fn occurrences(haystack: &str, needle: &str) -> usize {
    memchr::memmem::find_iter(haystack.as_bytes(), needle.as_bytes()).count()
}

#[test]
fn range_splice_round_trip_replaces_exactly_once() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("hello world");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append text");
    doc.set_selection(DomRange::in_text(text, 0, 11));

    let mut store = SnapshotStore::new();
    let snapshot = store.capture(locate(&doc).expect("located")).clone();

    let replaced = replace(&mut doc, &snapshot, "HELLO").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::RangeSplice);

    let content = doc.text_content(paragraph).expect("content");
    assert_eq!(occurrences(&content, "HELLO"), 1);
    assert_eq!(occurrences(&content, "hello world"), 0);
    assert_eq!(content, "HELLO");
}

#[test]
fn range_splice_preserves_surrounding_text() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("say hello world now");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append text");

    let snapshot = plain_snapshot("hello world", paragraph, DomRange::in_text(text, 4, 15));
    replace(&mut doc, &snapshot, "goodbye").expect("replace");

    assert_eq!(doc.text_content(paragraph).as_deref(), Some("say goodbye now"));
}

#[test]
fn plain_replacement_in_editable_owner_emits_edit_events() {
    let mut doc = Document::new();
    let editor = doc.create_editable("div");
    let text = doc.create_text("fix this phrase");
    doc.append_child(doc.root(), editor).expect("append");
    doc.append_child(editor, text).expect("append");

    let snapshot = plain_snapshot("this phrase", editor, DomRange::in_text(text, 4, 15));
    replace(&mut doc, &snapshot, "that").expect("replace");

    assert_eq!(doc.focused(), Some(editor));
    let kinds: Vec<_> = doc.drain_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntheticEventKind::Input,
            SyntheticEventKind::Change,
            SyntheticEventKind::CompositionEnd
        ]
    );
}

#[test]
fn plain_replacement_in_static_owner_emits_no_events() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("static text");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append");

    let snapshot = plain_snapshot("static", paragraph, DomRange::in_text(text, 0, 6));
    replace(&mut doc, &snapshot, "fixed").expect("replace");
    assert!(doc.events().is_empty());
}

#[test]
fn detached_range_falls_back_to_markup_substring() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let scaffold = doc.create_text("the quick brown fox");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, scaffold).expect("append");

    let snapshot = plain_snapshot("brown fox", paragraph, DomRange::in_text(scaffold, 10, 19));

    // Simulate the page rebuilding the paragraph's content between capture
    // and replacement: same text, different node, stale range.
    doc.remove(scaffold).expect("remove");
    let rebuilt = doc.create_text("the quick brown fox");
    doc.append_child(paragraph, rebuilt).expect("append rebuilt");

    let replaced = replace(&mut doc, &snapshot, "red panda").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::MarkupSubstring);
    assert_eq!(
        replaced.attempts()[0],
        super::Attempt {
            strategy: Strategy::RangeSplice,
            outcome: AttemptOutcome::Miss
        }
    );

    let content = doc.text_content(paragraph).expect("content");
    assert_eq!(content, "the quick red panda");
    assert_eq!(occurrences(&content, "brown fox"), 0);
}

#[test]
fn markup_substring_refuses_owners_with_element_children() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let lead = doc.create_text("the ");
    let bold = doc.create_element("b");
    let inner = doc.create_text("bold");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, lead).expect("append");
    doc.append_child(paragraph, bold).expect("append");
    doc.append_child(bold, inner).expect("append");

    let dead = doc.create_text("gone");
    let range = DomRange::in_text(dead, 0, 4);
    doc.remove(dead).expect("remove scaffold");
    let snapshot = plain_snapshot("the bold", paragraph, range);

    assert_eq!(plain::markup_substring(&mut doc, &snapshot, "X"), None);
}

#[test]
fn text_substring_flattens_markup_spanning_match() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let lead = doc.create_text("the ");
    let bold = doc.create_element("b");
    let inner = doc.create_text("bold");
    let tail = doc.create_text(" tail");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, lead).expect("append");
    doc.append_child(paragraph, bold).expect("append");
    doc.append_child(bold, inner).expect("append");
    doc.append_child(paragraph, tail).expect("append");

    let dead = doc.create_text("gone");
    let range = DomRange::in_text(dead, 0, 4);
    doc.remove(dead).expect("remove scaffold");
    let snapshot = plain_snapshot("the bold", paragraph, range);

    let replaced = replace(&mut doc, &snapshot, "a plain").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::TextSubstring);
    assert_eq!(doc.text_content(paragraph).as_deref(), Some("a plain tail"));
    assert!(doc.has_only_text_children(paragraph));
}

#[test]
fn node_walk_splits_matching_text_node() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let emphasis = doc.create_element("em");
    let text = doc.create_text("please find me here");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, emphasis).expect("append em");
    doc.append_child(emphasis, text).expect("append text");

    let dead = doc.create_text("gone");
    let range = DomRange::in_text(dead, 0, 4);
    doc.remove(dead).expect("remove scaffold");
    let snapshot = plain_snapshot("find me", paragraph, range);

    plain::node_walk(&mut doc, &snapshot, "FOUND").expect("tier fires");

    // The original node is gone, split into before/new/after.
    assert!(!doc.is_alive(text));
    assert_eq!(doc.element(emphasis).expect("em").children().len(), 3);
    assert_eq!(doc.text_content(paragraph).as_deref(), Some("please FOUND here"));
}

#[test]
fn node_walk_replaces_whole_node_without_padding_nodes() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("exact");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append text");

    let dead = doc.create_text("gone");
    let range = DomRange::in_text(dead, 0, 4);
    doc.remove(dead).expect("remove scaffold");
    let snapshot = plain_snapshot("exact", paragraph, range);

    plain::node_walk(&mut doc, &snapshot, "swapped").expect("tier fires");
    assert_eq!(doc.element(paragraph).expect("p").children().len(), 1);
    assert_eq!(doc.text_content(paragraph).as_deref(), Some("swapped"));
}

#[test]
fn range_splice_tier_misses_on_detached_range() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("content");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append");

    let range = DomRange::in_text(text, 0, 7);
    doc.remove(text).expect("remove");
    let snapshot = plain_snapshot("content", paragraph, range);

    assert_eq!(plain::range_splice(&mut doc, &snapshot, "X"), None);
}

#[test]
fn all_tiers_missing_reports_not_found() {
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("unrelated words");
    doc.append_child(doc.root(), paragraph).expect("append p");
    doc.append_child(paragraph, text).expect("append");

    let dead = doc.create_text("gone");
    let range = DomRange::in_text(dead, 0, 4);
    doc.remove(dead).expect("remove scaffold");
    let snapshot = plain_snapshot("never present", paragraph, range);

    let err = replace(&mut doc, &snapshot, "X").expect_err("must fail");
    let ReplaceError::NotFound { attempts } = err;
    assert_eq!(attempts.len(), 4);
    assert!(attempts.iter().all(|a| a.outcome == AttemptOutcome::Miss));
}

#[test]
fn input_offsets_splice_and_caret() {
    let mut doc = Document::new();
    let field = doc.create_input("say hello world now");
    doc.append_child(doc.root(), field).expect("append");

    let snapshot = input_snapshot("hello world", field, (4, 15));
    let replaced = replace(&mut doc, &snapshot, "hi").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::InputOffsets);
    assert!(!replaced.degraded());

    let input = doc.input_state(field).expect("input");
    assert_eq!(input.value(), "say hi now");
    assert_eq!(input.selection(), Some((6, 6)));
    assert_eq!(doc.focused(), Some(field));

    let kinds: Vec<_> = doc.drain_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntheticEventKind::Input,
            SyntheticEventKind::Change,
            SyntheticEventKind::KeyUp
        ]
    );
}

#[test]
fn input_stale_offsets_fall_back_to_verbatim_search() {
    let mut doc = Document::new();
    let field = doc.create_input("padding padding target here");
    doc.append_child(doc.root(), field).expect("append");
    let snapshot = input_snapshot("target", field, (16, 22));

    // The value shrinks under the snapshot; the stored offsets no longer fit
    // but the captured text still occurs verbatim.
    doc.set_input_value(field, "has target now").expect("set value");

    let replaced = replace(&mut doc, &snapshot, "goal").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::InputSearch);
    assert_eq!(
        doc.input_state(field).expect("input").value(),
        "has goal now"
    );
}

#[test]
fn input_unlocatable_text_replaces_entire_value() {
    let mut doc = Document::new();
    let field = doc.create_input("the original text was here");
    doc.append_child(doc.root(), field).expect("append");
    let snapshot = input_snapshot("original text", field, (4, 17));

    doc.set_input_value(field, "rewritten").expect("set value");

    let replaced = replace(&mut doc, &snapshot, "fresh").expect("replace");
    assert_eq!(replaced.strategy(), Strategy::InputFullValue);
    assert!(replaced.degraded());
    assert_eq!(doc.input_state(field).expect("input").value(), "fresh");
}

#[test]
fn input_replacement_on_removed_field_reports_not_found() {
    let mut doc = Document::new();
    let field = doc.create_input("text");
    doc.append_child(doc.root(), field).expect("append");
    let snapshot = input_snapshot("text", field, (0, 4));

    doc.remove(field).expect("remove");
    assert!(replace(&mut doc, &snapshot, "X").is_err());
}

#[test]
fn attempt_trail_records_miss_then_applied() {
    let mut doc = Document::new();
    let field = doc.create_input("aaa bbb ccc");
    doc.append_child(doc.root(), field).expect("append");
    let snapshot = input_snapshot("bbb", field, (4, 7));

    doc.set_input_value(field, "bbb").expect("shrink");

    let replaced = replace(&mut doc, &snapshot, "z").expect("replace");
    let outcomes: Vec<_> = replaced
        .attempts()
        .iter()
        .map(|a| (a.strategy, a.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (Strategy::InputOffsets, AttemptOutcome::Miss),
            (Strategy::InputSearch, AttemptOutcome::Applied),
        ]
    );
}
