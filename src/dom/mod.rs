// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory page model.
//!
//! A small arena-backed tree (elements, text nodes, input fields) with focus,
//! a live page selection, cloneable ranges with checked validity, and an
//! ordered log of synthetic input-lifecycle events. This is the substrate the
//! locator, snapshot store, and replacement engine operate against; the host
//! mirrors its real page into it.

pub mod document;
pub mod node;
pub mod range;

pub use document::{Document, MAX_EDITABLE_SCAN_DEPTH};
pub(crate) use document::span_on_boundaries;
pub use node::{
    DomError, ElementData, InputState, Node, NodeId, Rect, SyntheticEvent, SyntheticEventKind,
    TextData, Viewport,
};
pub use range::{DomRange, RangeBoundary};
