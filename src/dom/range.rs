// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::node::NodeId;

/// One endpoint of a [`DomRange`]: a text node plus a byte offset into its
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBoundary {
    pub node: NodeId,
    pub offset: usize,
}

impl RangeBoundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A cloneable pair of boundaries over text nodes.
///
/// A range carries no document reference; whether it is still attached to a
/// live document is a checked query ([`crate::dom::Document::range_is_attached`]),
/// never an error path. Stale ranges are an expected runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    pub(super) start: RangeBoundary,
    pub(super) end: RangeBoundary,
}

impl DomRange {
    pub fn new(start: RangeBoundary, end: RangeBoundary) -> Self {
        Self { start, end }
    }

    /// Convenience for the common case of a span inside a single text node.
    pub fn in_text(node: NodeId, start: usize, end: usize) -> Self {
        Self {
            start: RangeBoundary::new(node, start),
            end: RangeBoundary::new(node, end),
        }
    }

    /// A caret: both boundaries at the same position.
    pub fn collapsed(node: NodeId, offset: usize) -> Self {
        Self::in_text(node, offset, offset)
    }

    pub fn start(&self) -> RangeBoundary {
        self.start
    }

    pub fn end(&self) -> RangeBoundary {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}
