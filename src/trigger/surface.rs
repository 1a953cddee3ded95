// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::dom::NodeId;
use crate::options::MenuEntry;

use super::Anchor;

/// User-visible outcome notifications. How they are rendered, and for how
/// long, is entirely the surface's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The rewrite was applied. `degraded` marks the whole-value fallback,
    /// which may have clobbered text outside the selection.
    Applied { degraded: bool },
    /// The rewrite itself failed; the trigger stays available for a retry.
    RefineFailed { message: String },
    /// The original text could not be found again; the user must reselect.
    ReselectNeeded,
    /// The host runtime went away; the trigger tears down for this page.
    RuntimeGone,
}

/// The rendering side of the trigger: a floating button, a dropdown menu, a
/// busy indicator, and transient notices.
///
/// The controller never draws; it drives one of these. Calls arrive in
/// state-machine order, so a surface may be as dumb as a log.
pub trait TriggerSurface {
    fn show_button(&mut self, anchor: Anchor);
    fn show_menu(&mut self, anchor: Anchor, entries: Vec<MenuEntry>);
    fn set_busy(&mut self, busy: bool);
    fn hide(&mut self);
    fn notify(&mut self, notice: Notice);
    /// Whether `node` is part of the surface's own chrome. Clicks on owned
    /// nodes never count as page clicks.
    fn owns(&self, node: NodeId) -> bool;
}

/// Surface that draws nothing. For headless embedders and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl TriggerSurface for NullSurface {
    fn show_button(&mut self, _anchor: Anchor) {}
    fn show_menu(&mut self, _anchor: Anchor, _entries: Vec<MenuEntry>) {}
    fn set_busy(&mut self, _busy: bool) {}
    fn hide(&mut self) {}
    fn notify(&mut self, _notice: Notice) {}
    fn owns(&self, _node: NodeId) -> bool {
        false
    }
}

/// What a [`RecordingSurface`] saw, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Button(Anchor),
    Menu(Anchor, Vec<MenuEntry>),
    Busy(bool),
    Hide,
    Notice(Notice),
}

/// Surface that records every call. The test double embedders reach for when
/// asserting on controller behavior.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub owned: Vec<NodeId>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn last_call(&self) -> Option<&SurfaceCall> {
        self.calls.last()
    }
}

impl TriggerSurface for RecordingSurface {
    fn show_button(&mut self, anchor: Anchor) {
        self.calls.push(SurfaceCall::Button(anchor));
    }

    fn show_menu(&mut self, anchor: Anchor, entries: Vec<MenuEntry>) {
        self.calls.push(SurfaceCall::Menu(anchor, entries));
    }

    fn set_busy(&mut self, busy: bool) {
        self.calls.push(SurfaceCall::Busy(busy));
    }

    fn hide(&mut self) {
        self.calls.push(SurfaceCall::Hide);
    }

    fn notify(&mut self, notice: Notice) {
        self.calls.push(SurfaceCall::Notice(notice));
    }

    fn owns(&self, node: NodeId) -> bool {
        self.owned.contains(&node)
    }
}
