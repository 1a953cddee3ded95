// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use memchr::memmem;

use crate::dom::{span_on_boundaries, Document, SyntheticEventKind};
use crate::select::{SelectionSnapshot, SnapshotTarget};

use super::{record, Attempt, AttemptOutcome, Replaced, ReplaceError, Strategy};

/// Input/textarea replacement: recompute the span, splice the value, place
/// the caret after the inserted text, refocus, and notify.
///
/// The stored offsets are preferred; when the value changed underneath them
/// the captured text is searched verbatim; as a last resort the whole value
/// is replaced (degraded, logged).
pub(super) fn replace_in_input(
    doc: &mut Document,
    snapshot: &SelectionSnapshot,
    new_text: &str,
) -> Result<Replaced, ReplaceError> {
    let mut attempts = Vec::new();
    let owner = snapshot.owner();
    let Some(input) = doc.input_state(owner) else {
        record(&mut attempts, Strategy::InputOffsets, AttemptOutcome::Miss);
        record(&mut attempts, Strategy::InputSearch, AttemptOutcome::Miss);
        record(&mut attempts, Strategy::InputFullValue, AttemptOutcome::Miss);
        return Err(ReplaceError::NotFound { attempts });
    };
    let value = input.value().to_owned();

    let stored = match snapshot.target() {
        SnapshotTarget::Input { bounds } => bounds,
        SnapshotTarget::Plain { .. } => {
            // Kind mismatch between snapshot and owner; nothing to splice.
            record(&mut attempts, Strategy::InputOffsets, AttemptOutcome::Miss);
            return Err(ReplaceError::NotFound { attempts });
        }
    };

    let span = if stored.0 < stored.1 && span_on_boundaries(&value, stored.0, stored.1) {
        record(&mut attempts, Strategy::InputOffsets, AttemptOutcome::Applied);
        stored
    } else {
        record(&mut attempts, Strategy::InputOffsets, AttemptOutcome::Miss);
        match memmem::find(value.as_bytes(), snapshot.text().as_bytes()) {
            Some(index) => {
                record(&mut attempts, Strategy::InputSearch, AttemptOutcome::Applied);
                (index, index + snapshot.text().len())
            }
            None => {
                record(&mut attempts, Strategy::InputSearch, AttemptOutcome::Miss);
                record(
                    &mut attempts,
                    Strategy::InputFullValue,
                    AttemptOutcome::Applied,
                );
                tracing::warn!(
                    owner = %owner,
                    "input offsets stale and text not found; replacing entire value"
                );
                (0, value.len())
            }
        }
    };

    let mut next = String::with_capacity(value.len() - (span.1 - span.0) + new_text.len());
    next.push_str(&value[..span.0]);
    next.push_str(new_text);
    next.push_str(&value[span.1..]);

    let strategy = attempts
        .iter()
        .rev()
        .find(|attempt| attempt.outcome == AttemptOutcome::Applied)
        .map(|attempt| attempt.strategy)
        .unwrap_or(Strategy::InputFullValue);

    let caret = span.0 + new_text.len();
    if doc.set_input_value(owner, next).is_err() {
        return Err(ReplaceError::NotFound { attempts });
    }
    let _ = doc.set_input_selection(owner, Some((caret, caret)));
    let _ = doc.set_focus(Some(owner));
    doc.emit(owner, SyntheticEventKind::Input);
    doc.emit(owner, SyntheticEventKind::Change);
    doc.emit(owner, SyntheticEventKind::KeyUp);

    Ok(Replaced { strategy, attempts })
}
