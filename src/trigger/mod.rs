// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trigger lifecycle: the state machine driving the floating refine button.
//!
//! The controller owns the selection snapshot and walks Hidden, ButtonShown,
//! MenuOpen, and Processing in response to page events. Rendering is behind
//! [`TriggerSurface`]; the rewrite round trip is split into a begin half that
//! hands out a ticketed wire request and a complete half that applies the
//! reply only while its ticket is still current.

mod anchor;
mod surface;

use std::fmt;

use crate::dispatch::{HostRuntime, RefineRequest, RefineResponse, RuntimeHealth};
use crate::dom::{Document, NodeId, Rect};
use crate::options::{find_option, menu_entries, RefineOption};
use crate::replace::{replace, Replaced, ReplaceError};
use crate::select::{locate, SelectionSnapshot, SnapshotStore};

pub use anchor::{button_anchor, Anchor};
pub use surface::{Notice, NullSurface, RecordingSurface, SurfaceCall, TriggerSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Hidden,
    ButtonShown,
    MenuOpen,
    Processing,
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hidden => "hidden",
            Self::ButtonShown => "button-shown",
            Self::MenuOpen => "menu-open",
            Self::Processing => "processing",
        })
    }
}

/// Why a rewrite could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginError {
    /// Rewrites start from the open menu only.
    MenuClosed { state: TriggerState },
    /// No snapshot to rewrite. The trigger conceals itself.
    NoSelection,
    UnknownOption { id: String },
    /// The host runtime is gone; the trigger tore itself down.
    RuntimeGone,
}

impl fmt::Display for BeginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MenuClosed { state } => write!(f, "menu is not open (state={state})"),
            Self::NoSelection => write!(f, "no selection snapshot to rewrite"),
            Self::UnknownOption { id } => write!(f, "unknown refine option (id={id})"),
            Self::RuntimeGone => write!(f, "host runtime is no longer reachable"),
        }
    }
}

impl std::error::Error for BeginError {}

/// A started rewrite: the request to put on the wire and the ticket that
/// [`TriggerController::complete_refine`] will check it against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRefine {
    pub ticket: u64,
    pub request: RefineRequest,
}

/// What completing a rewrite amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The ticket was no longer current; the reply was dropped unseen.
    Stale,
    Applied(Replaced),
    /// The original text could not be found again.
    ReselectNeeded,
    /// The rewrite failed; the trigger stays up for a retry.
    Failed { message: String },
}

/// Owns trigger state, the snapshot slot, and the custom option list.
///
/// One controller per page. All handlers are synchronous; the embedder runs
/// the wire round trip between `begin_refine` and `complete_refine` however
/// it likes.
#[derive(Debug, Default)]
pub struct TriggerController {
    state: TriggerState,
    store: SnapshotStore,
    customs: Vec<RefineOption>,
    last_anchor: Option<Anchor>,
    generation: u64,
}

impl TriggerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.store.current()
    }

    pub fn custom_options(&self) -> &[RefineOption] {
        &self.customs
    }

    /// Replaces the custom option list, typically from a profile store watch
    /// subscription. Takes effect the next time the menu opens.
    pub fn set_custom_options(&mut self, customs: Vec<RefineOption>) {
        self.customs = customs;
    }

    /// A selection change has settled. Shows or hides the button accordingly;
    /// a re-fire for the same text is a no-op, and nothing moves while the
    /// menu is open or a rewrite is in flight.
    pub fn selection_settled(&mut self, doc: &Document, surface: &mut dyn TriggerSurface) {
        if matches!(self.state, TriggerState::MenuOpen | TriggerState::Processing) {
            return;
        }
        let Some(located) = locate(doc) else {
            self.conceal(surface);
            return;
        };
        if self.state != TriggerState::Hidden && self.store.holds_text(located.text()) {
            return;
        }
        let rect = doc.nearest_rect(located.owner()).unwrap_or(Rect {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
        });
        let anchor = button_anchor(rect, doc.viewport(), located.kind());
        // A new capture always tears down whatever trigger UI was showing.
        if self.state != TriggerState::Hidden {
            surface.hide();
        }
        let snapshot = self.store.capture(located);
        tracing::debug!(text_chars = snapshot.text().len(), "selection captured");
        self.last_anchor = Some(anchor);
        self.state = TriggerState::ButtonShown;
        surface.show_button(anchor);
    }

    /// A click landed somewhere on the page. Clicks on the surface's own
    /// chrome are ignored. An outside click closes only the menu when it is
    /// open; the button and snapshot stay. Otherwise the trigger conceals,
    /// unless a rewrite is in flight.
    pub fn page_click(&mut self, target: Option<NodeId>, surface: &mut dyn TriggerSurface) {
        if let Some(node) = target {
            if surface.owns(node) {
                return;
            }
        }
        match self.state {
            TriggerState::Processing => {}
            TriggerState::MenuOpen => self.dismiss_menu(surface),
            TriggerState::Hidden | TriggerState::ButtonShown => self.conceal(surface),
        }
    }

    /// The floating button was clicked: open the option menu.
    pub fn trigger_clicked(&mut self, surface: &mut dyn TriggerSurface) {
        if self.state != TriggerState::ButtonShown {
            return;
        }
        let Some(anchor) = self.last_anchor else {
            return;
        };
        self.state = TriggerState::MenuOpen;
        surface.show_menu(anchor, menu_entries(&self.customs));
    }

    /// Closes the menu without discarding the selection; the button stays.
    pub fn dismiss_menu(&mut self, surface: &mut dyn TriggerSurface) {
        if self.state != TriggerState::MenuOpen {
            return;
        }
        self.state = TriggerState::ButtonShown;
        if let Some(anchor) = self.last_anchor {
            surface.show_button(anchor);
        }
    }

    /// A menu option was chosen. Probes the runtime, then moves to Processing
    /// and hands back the ticketed wire request for the embedder to dispatch.
    pub fn begin_refine(
        &mut self,
        option_id: &str,
        runtime: &dyn HostRuntime,
        surface: &mut dyn TriggerSurface,
    ) -> Result<PendingRefine, BeginError> {
        if self.state != TriggerState::MenuOpen {
            return Err(BeginError::MenuClosed { state: self.state });
        }
        if runtime.probe() == RuntimeHealth::Invalidated {
            self.teardown(surface);
            return Err(BeginError::RuntimeGone);
        }
        let Some(option) = find_option(option_id, &self.customs) else {
            return Err(BeginError::UnknownOption {
                id: option_id.to_owned(),
            });
        };
        let Some(snapshot) = self.store.current() else {
            self.conceal(surface);
            return Err(BeginError::NoSelection);
        };
        let request = RefineRequest::new(snapshot.text(), option.id.clone());
        self.generation += 1;
        self.state = TriggerState::Processing;
        surface.set_busy(true);
        tracing::info!(option = %option.id, ticket = self.generation, "rewrite started");
        Ok(PendingRefine {
            ticket: self.generation,
            request,
        })
    }

    /// The wire reply for `ticket` came back. Stale tickets are dropped
    /// without touching the document; a selection superseded mid-flight must
    /// never receive the old rewrite.
    pub fn complete_refine(
        &mut self,
        doc: &mut Document,
        surface: &mut dyn TriggerSurface,
        ticket: u64,
        reply: RefineResponse,
    ) -> Completion {
        if self.state != TriggerState::Processing || ticket != self.generation {
            tracing::debug!(ticket, current = self.generation, "dropping stale rewrite reply");
            return Completion::Stale;
        }
        surface.set_busy(false);
        match reply.into_result() {
            Ok(refined) => {
                let Some(snapshot) = self.store.current().cloned() else {
                    self.conceal(surface);
                    return Completion::ReselectNeeded;
                };
                match replace(doc, &snapshot, &refined) {
                    Ok(replaced) => {
                        surface.notify(Notice::Applied {
                            degraded: replaced.degraded(),
                        });
                        self.conceal(surface);
                        Completion::Applied(replaced)
                    }
                    Err(ReplaceError::NotFound { .. }) => {
                        surface.notify(Notice::ReselectNeeded);
                        self.conceal(surface);
                        Completion::ReselectNeeded
                    }
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "rewrite failed, keeping trigger for retry");
                surface.notify(Notice::RefineFailed {
                    message: message.clone(),
                });
                self.state = TriggerState::ButtonShown;
                if let Some(anchor) = self.last_anchor {
                    surface.show_button(anchor);
                }
                Completion::Failed { message }
            }
        }
    }

    /// The host runtime went away. Tears the trigger down for good on this
    /// page; only a reload brings it back.
    pub fn teardown(&mut self, surface: &mut dyn TriggerSurface) {
        surface.notify(Notice::RuntimeGone);
        self.conceal(surface);
    }

    fn conceal(&mut self, surface: &mut dyn TriggerSurface) {
        if self.state == TriggerState::Hidden && self.store.current().is_none() {
            return;
        }
        self.state = TriggerState::Hidden;
        self.store.clear();
        self.last_anchor = None;
        surface.hide();
    }
}
