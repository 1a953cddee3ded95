// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::dom::{Rect, Viewport};
use crate::select::SelectionKind;

// Minimum distance to the viewport edges, and the width reserved on the right
// so the button never hangs past the window.
const EDGE_MARGIN: i32 = 10;
const RIGHT_RESERVE: i32 = 80;

/// Where the trigger button lands, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub left: i32,
    pub top: i32,
    /// The preferred spot above the selection was too close to the viewport
    /// top, so the button flipped below instead.
    pub below: bool,
}

/// Places the trigger button relative to the selection's bounding box.
///
/// Plain selections get the button centered above the box; input selections
/// get it tucked near the field's right edge, where the caret usually is.
/// When the spot above would leave the viewport, the button flips below.
pub fn button_anchor(rect: Rect, viewport: Viewport, kind: SelectionKind) -> Anchor {
    let (raw_left, raw_top, below_gap) = match kind {
        SelectionKind::InputRange => (rect.right() - 75, rect.top - 30, 3),
        SelectionKind::PlainRange => (rect.left + rect.width / 2 - 30, rect.top - 35, 5),
    };

    let mut below = false;
    let mut top = raw_top;
    if top < EDGE_MARGIN {
        top = rect.bottom() + below_gap;
        below = true;
    }
    let left = raw_left.clamp(EDGE_MARGIN, (viewport.width - RIGHT_RESERVE).max(EDGE_MARGIN));

    Anchor {
        left: left + viewport.scroll_x,
        top: top + viewport.scroll_y,
        below,
    }
}
