// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

/// A generational handle into the document arena.
///
/// Removing a subtree bumps the generation of every freed slot, so a stale
/// `NodeId` can always be *detected* (lookups return `None`) but never
/// resolves to unrelated live content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(super) index: u32,
    pub(super) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}g{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(ElementData),
    Text(TextData),
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match self {
            Self::Element(_) => None,
            Self::Text(data) => Some(data),
        }
    }
}

/// Editable value state of an input-like element (`<input>`/`<textarea>`
/// analogue).
///
/// `selection` bounds are byte offsets into `value` and always lie on char
/// boundaries while set through [`crate::dom::Document`]; offsets captured
/// earlier may go stale once the value changes and must be revalidated at the
/// point of use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub(super) value: String,
    pub(super) selection: Option<(usize, usize)>,
    pub(super) multiline: bool,
}

impl InputState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn multiline(&self) -> bool {
        self.multiline
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub(super) tag: SmolStr,
    pub(super) parent: Option<NodeId>,
    pub(super) children: SmallVec<[NodeId; 4]>,
    pub(super) editable: bool,
    pub(super) input: Option<InputState>,
    pub(super) rect: Option<Rect>,
}

impl ElementData {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this element itself is marked editable (contenteditable
    /// analogue). Inherited editability is answered by
    /// [`crate::dom::Document::closest_editable`].
    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn input(&self) -> Option<&InputState> {
        self.input.as_ref()
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextData {
    pub(super) parent: Option<NodeId>,
    pub(super) content: String,
}

impl TextData {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Synthetic input-lifecycle notification emitted toward the host page.
///
/// Replacement emits these so host scripts and reactive frameworks observe a
/// natural edit rather than a script-only mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEventKind {
    Input,
    Change,
    KeyUp,
    CompositionEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub target: NodeId,
    pub kind: SyntheticEventKind,
}

/// On-page bounding box in page coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Visible window onto the page, in the same coordinate space as [`Rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub scroll_x: i32,
    pub scroll_y: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            scroll_x: 0,
            scroll_y: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    Detached { node: NodeId },
    NotAnElement { node: NodeId },
    NotAText { node: NodeId },
    NotAnInput { node: NodeId },
    InvalidOffset { node: NodeId, offset: usize, len: usize },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached { node } => write!(f, "node is detached (node={node})"),
            Self::NotAnElement { node } => write!(f, "node is not an element (node={node})"),
            Self::NotAText { node } => write!(f, "node is not a text node (node={node})"),
            Self::NotAnInput { node } => write!(f, "element has no input state (node={node})"),
            Self::InvalidOffset { node, offset, len } => {
                write!(f, "offset out of bounds or off char boundary (node={node}, offset={offset}, len={len})")
            }
        }
    }
}

impl std::error::Error for DomError {}
