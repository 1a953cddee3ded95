// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end flow: select, trigger, dispatch, replace.

use async_trait::async_trait;
use tempfile::TempDir;

use galatea::config::ProfileStore;
use galatea::dispatch::{handle_request, AlwaysAlive, DispatchError, Dispatcher};
use galatea::dom::{Document, DomRange, NodeId, Rect, SyntheticEventKind};
use galatea::options::RefineOption;
use galatea::replace::Strategy;
use galatea::trigger::{Completion, RecordingSurface, TriggerController, TriggerState};

/// Uppercases whatever it is asked to refine. Stands in for the remote model.
struct Shouty;

#[async_trait]
impl Dispatcher for Shouty {
    async fn refine(&self, text: &str, _option: &RefineOption) -> Result<String, DispatchError> {
        Ok(text.to_uppercase())
    }
}

struct Unreachable;

#[async_trait]
impl Dispatcher for Unreachable {
    async fn refine(&self, _text: &str, _option: &RefineOption) -> Result<String, DispatchError> {
        Err(DispatchError::Api {
            status: 503,
            message: "service unavailable".to_owned(),
        })
    }
}

fn editable_doc() -> (Document, NodeId) {
    let mut doc = Document::new();
    let editor = doc.create_editable("div");
    doc.append_child(doc.root(), editor).expect("attach editor");
    let text = doc.create_text("please review this draft paragraph");
    doc.append_child(editor, text).expect("attach text");
    doc.set_rect(
        editor,
        Rect {
            left: 120,
            top: 300,
            width: 500,
            height: 80,
        },
    )
    .expect("rect");
    // "this draft"
    doc.set_selection(DomRange::in_text(text, 14, 24));
    (doc, editor)
}

#[tokio::test]
async fn full_refine_flow_from_selection_to_replacement() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = ProfileStore::open(dir.path().join("profile.json")).expect("open store");
    store.set_credential("sk-test-123").expect("credential");
    store
        .add_custom_prompt("Pirate voice", "Rewrite as a pirate:")
        .expect("add prompt");

    let (mut doc, editor) = editable_doc();
    let mut surface = RecordingSurface::new();
    let mut controller = TriggerController::new();
    controller.set_custom_options(store.custom_options());

    controller.selection_settled(&doc, &mut surface);
    assert_eq!(controller.state(), TriggerState::ButtonShown);

    controller.trigger_clicked(&mut surface);
    assert_eq!(controller.state(), TriggerState::MenuOpen);

    let pending = controller
        .begin_refine("custom-0", &AlwaysAlive, &mut surface)
        .expect("begin");
    assert_eq!(pending.request.text, "this draft");

    let reply = handle_request(&Shouty, store.custom_options().as_slice(), &pending.request).await;
    let completion = controller.complete_refine(&mut doc, &mut surface, pending.ticket, reply);

    let Completion::Applied(replaced) = completion else {
        panic!("expected an applied completion");
    };
    assert_eq!(replaced.strategy(), Strategy::RangeSplice);
    assert_eq!(
        doc.text_content(editor).expect("content"),
        "please review THIS DRAFT paragraph"
    );
    assert_eq!(controller.state(), TriggerState::Hidden);

    // The editable owner saw a natural edit.
    let kinds: Vec<_> = doc.drain_events().into_iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        [
            SyntheticEventKind::Input,
            SyntheticEventKind::Change,
            SyntheticEventKind::CompositionEnd,
        ]
    );
}

#[tokio::test]
async fn transport_failure_leaves_the_page_untouched_and_retryable() {
    let (mut doc, editor) = editable_doc();
    let mut surface = RecordingSurface::new();
    let mut controller = TriggerController::new();

    controller.selection_settled(&doc, &mut surface);
    controller.trigger_clicked(&mut surface);
    let pending = controller
        .begin_refine("shorten", &AlwaysAlive, &mut surface)
        .expect("begin");

    let reply = handle_request(&Unreachable, &[], &pending.request).await;
    let completion = controller.complete_refine(&mut doc, &mut surface, pending.ticket, reply);

    assert!(matches!(completion, Completion::Failed { .. }));
    assert_eq!(
        doc.text_content(editor).expect("content"),
        "please review this draft paragraph"
    );
    assert_eq!(controller.state(), TriggerState::ButtonShown);

    // Same snapshot, second attempt, this time through a working dispatcher.
    controller.trigger_clicked(&mut surface);
    let retry = controller
        .begin_refine("shorten", &AlwaysAlive, &mut surface)
        .expect("retry");
    assert_eq!(retry.request.text, "this draft");
    assert!(retry.ticket > pending.ticket);

    let reply = handle_request(&Shouty, &[], &retry.request).await;
    let completion = controller.complete_refine(&mut doc, &mut surface, retry.ticket, reply);
    assert!(matches!(completion, Completion::Applied(_)));
    assert_eq!(
        doc.text_content(editor).expect("content"),
        "please review THIS DRAFT paragraph"
    );
}

#[tokio::test]
async fn input_field_flow_replaces_within_the_value() {
    let mut doc = Document::new();
    let field = doc.create_textarea("dear team, see attached notes");
    doc.append_child(doc.root(), field).expect("attach");
    doc.set_rect(
        field,
        Rect {
            left: 40,
            top: 60,
            width: 400,
            height: 120,
        },
    )
    .expect("rect");
    doc.set_focus(Some(field)).expect("focus");
    // "see attached notes"
    doc.set_input_selection(field, Some((11, 29))).expect("select");

    let mut surface = RecordingSurface::new();
    let mut controller = TriggerController::new();
    controller.selection_settled(&doc, &mut surface);
    controller.trigger_clicked(&mut surface);
    let pending = controller
        .begin_refine("formal", &AlwaysAlive, &mut surface)
        .expect("begin");

    let reply = handle_request(&Shouty, &[], &pending.request).await;
    let completion = controller.complete_refine(&mut doc, &mut surface, pending.ticket, reply);

    assert!(matches!(completion, Completion::Applied(_)));
    assert_eq!(
        doc.input_state(field).expect("input").value(),
        "dear team, SEE ATTACHED NOTES"
    );
}
