// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::node::{
    DomError, ElementData, InputState, Node, NodeId, Rect, SyntheticEvent, SyntheticEventKind,
    TextData, Viewport,
};
use super::range::{DomRange, RangeBoundary};

/// Ancestor walk budget when resolving inherited editability, mirroring the
/// bounded hierarchy scan hosts apply to pathological trees.
pub const MAX_EDITABLE_SCAN_DEPTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The page model the engine runs against.
///
/// An arena-backed tree of elements and text nodes with focus, a live page
/// selection, input-field value state, and an ordered log of synthetic
/// input-lifecycle events. Node handles are generational: handles to removed
/// nodes stop resolving instead of aliasing new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
    focused: Option<NodeId>,
    selection: Option<DomRange>,
    events: Vec<SyntheticEvent>,
    viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            focused: None,
            selection: None,
            events: Vec::new(),
            viewport: Viewport::default(),
        };
        doc.root = doc.alloc(Node::Element(ElementData {
            tag: SmolStr::new_static("body"),
            parent: None,
            children: SmallVec::new(),
            editable: false,
            input: None,
            rect: None,
        }));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.slots.iter().position(|slot| slot.node.is_none()) {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index: index as u32,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    pub fn create_element(&mut self, tag: impl Into<SmolStr>) -> NodeId {
        self.alloc(Node::Element(ElementData {
            tag: tag.into(),
            parent: None,
            children: SmallVec::new(),
            editable: false,
            input: None,
            rect: None,
        }))
    }

    /// Creates an element marked editable (contenteditable analogue).
    pub fn create_editable(&mut self, tag: impl Into<SmolStr>) -> NodeId {
        let id = self.create_element(tag);
        if let Some(Node::Element(data)) = self.node_mut(id) {
            data.editable = true;
        }
        id
    }

    /// Creates a single-line input field holding `value`.
    pub fn create_input(&mut self, value: impl Into<String>) -> NodeId {
        self.create_field("input", value, false)
    }

    /// Creates a multi-line input field holding `value`.
    pub fn create_textarea(&mut self, value: impl Into<String>) -> NodeId {
        self.create_field("textarea", value, true)
    }

    fn create_field(&mut self, tag: &'static str, value: impl Into<String>, multiline: bool) -> NodeId {
        self.alloc(Node::Element(ElementData {
            tag: SmolStr::new_static(tag),
            parent: None,
            children: SmallVec::new(),
            editable: false,
            input: Some(InputState {
                value: value.into(),
                selection: None,
                multiline,
            }),
            rect: None,
        }))
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(Node::Text(TextData {
            parent: None,
            content: content.into(),
        }))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id)?.as_element()
    }

    pub fn text(&self, id: NodeId) -> Option<&TextData> {
        self.node(id)?.as_text()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id)? {
            Node::Element(data) => data.parent,
            Node::Text(data) => data.parent,
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            match node {
                Node::Element(data) => data.parent = parent,
                Node::Text(data) => data.parent = parent,
            }
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.attach(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.attach(parent, child, Some(reference))
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if self.node(child).is_none() {
            return Err(DomError::Detached { node: child });
        }
        let Some(Node::Element(data)) = self.node(parent) else {
            return Err(DomError::NotAnElement { node: parent });
        };
        let position = match reference {
            Some(reference) => {
                let Some(position) = data.children.iter().position(|id| *id == reference) else {
                    return Err(DomError::Detached { node: reference });
                };
                position
            }
            None => data.children.len(),
        };
        if let Some(Node::Element(data)) = self.node_mut(parent) {
            data.children.insert(position, child);
        }
        self.set_parent(child, Some(parent));
        Ok(())
    }

    /// Detaches `id` from its parent and frees the whole subtree. Handles
    /// into the subtree stop resolving from this point on.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if self.node(id).is_none() {
            return Err(DomError::Detached { node: id });
        }
        if let Some(parent) = self.parent(id) {
            if let Some(Node::Element(data)) = self.node_mut(parent) {
                data.children.retain(|child| *child != id);
            }
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(Node::Element(data)) = self.node(current) {
                stack.extend(data.children.iter().copied());
            }
            if self.focused == Some(current) {
                self.focused = None;
            }
            if let Some(slot) = self.slots.get_mut(current.index as usize) {
                if slot.generation == current.generation {
                    slot.node = None;
                    slot.generation = slot.generation.wrapping_add(1);
                }
            }
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn set_focus(&mut self, id: Option<NodeId>) -> Result<(), DomError> {
        if let Some(id) = id {
            if self.element(id).is_none() {
                return Err(DomError::NotAnElement { node: id });
            }
        }
        self.focused = id;
        Ok(())
    }

    pub fn set_editable(&mut self, id: NodeId, editable: bool) -> Result<(), DomError> {
        let Some(Node::Element(data)) = self.node_mut(id) else {
            return Err(DomError::NotAnElement { node: id });
        };
        data.editable = editable;
        Ok(())
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> Result<(), DomError> {
        let Some(Node::Element(data)) = self.node_mut(id) else {
            return Err(DomError::NotAnElement { node: id });
        };
        data.rect = Some(rect);
        Ok(())
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.element(id)?.rect
    }

    /// Nearest rect at or above `id`, for anchoring UI next to a selection
    /// whose own node carries no geometry.
    pub fn nearest_rect(&self, id: NodeId) -> Option<Rect> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(data) = self.element(node) {
                if let Some(rect) = data.rect {
                    return Some(rect);
                }
            }
            current = self.parent(node);
        }
        None
    }

    // --- input fields ---

    pub fn input_state(&self, id: NodeId) -> Option<&InputState> {
        self.element(id)?.input.as_ref()
    }

    pub fn is_input(&self, id: NodeId) -> bool {
        self.input_state(id).is_some()
    }

    pub fn set_input_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        let Some(Node::Element(data)) = self.node_mut(id) else {
            return Err(DomError::NotAnElement { node: id });
        };
        let Some(input) = data.input.as_mut() else {
            return Err(DomError::NotAnInput { node: id });
        };
        input.value = value.into();
        // Any previously reported selection may now be out of bounds.
        if let Some((start, end)) = input.selection {
            if !span_on_boundaries(&input.value, start, end) {
                input.selection = None;
            }
        }
        Ok(())
    }

    pub fn set_input_selection(
        &mut self,
        id: NodeId,
        selection: Option<(usize, usize)>,
    ) -> Result<(), DomError> {
        let Some(Node::Element(data)) = self.node_mut(id) else {
            return Err(DomError::NotAnElement { node: id });
        };
        let Some(input) = data.input.as_mut() else {
            return Err(DomError::NotAnInput { node: id });
        };
        if let Some((start, end)) = selection {
            if !span_on_boundaries(&input.value, start, end) {
                return Err(DomError::InvalidOffset {
                    node: id,
                    offset: end,
                    len: input.value.len(),
                });
            }
        }
        input.selection = selection;
        Ok(())
    }

    // --- text nodes ---

    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> Result<(), DomError> {
        let Some(Node::Text(data)) = self.node_mut(id) else {
            return Err(DomError::NotAText { node: id });
        };
        data.content = content.into();
        Ok(())
    }

    // --- page selection ---

    pub fn set_selection(&mut self, range: DomRange) {
        self.selection = Some(range);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<DomRange> {
        self.selection
    }

    /// Stringifies the live page selection, or empty when there is none or it
    /// has gone stale.
    pub fn selection_text(&self) -> String {
        self.selection
            .and_then(|range| self.range_text(&range))
            .unwrap_or_default()
    }

    // --- ranges ---

    fn attached_to_root(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn order_path(&self, id: NodeId) -> Option<Vec<u32>> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let data = self.element(parent)?;
            let position = data.children.iter().position(|child| *child == current)?;
            path.push(position as u32);
            current = parent;
        }
        if current != self.root {
            return None;
        }
        path.reverse();
        Some(path)
    }

    fn boundary_cmp(&self, a: RangeBoundary, b: RangeBoundary) -> Option<Ordering> {
        if a.node == b.node {
            return Some(a.offset.cmp(&b.offset));
        }
        let path_a = self.order_path(a.node)?;
        let path_b = self.order_path(b.node)?;
        Some(path_a.cmp(&path_b))
    }

    fn boundary_is_valid(&self, boundary: RangeBoundary) -> bool {
        let Some(data) = self.text(boundary.node) else {
            return false;
        };
        self.attached_to_root(boundary.node)
            && boundary.offset <= data.content.len()
            && data.content.is_char_boundary(boundary.offset)
    }

    /// Whether the range still addresses live, ordered text in this document.
    pub fn range_is_attached(&self, range: &DomRange) -> bool {
        self.boundary_is_valid(range.start)
            && self.boundary_is_valid(range.end)
            && self
                .boundary_cmp(range.start, range.end)
                .is_some_and(|order| order != Ordering::Greater)
    }

    /// Text covered by the range in document order, or `None` when stale.
    pub fn range_text(&self, range: &DomRange) -> Option<String> {
        if !self.range_is_attached(range) {
            return None;
        }
        if range.is_collapsed() {
            return Some(String::new());
        }
        if range.start.node == range.end.node {
            let content = &self.text(range.start.node)?.content;
            return Some(content[range.start.offset..range.end.offset].to_owned());
        }

        let mut out = String::new();
        let mut inside = false;
        for node in self.text_nodes_in_order(self.root) {
            if node == range.start.node {
                let content = &self.text(node)?.content;
                out.push_str(&content[range.start.offset..]);
                inside = true;
            } else if node == range.end.node {
                let content = &self.text(node)?.content;
                out.push_str(&content[..range.end.offset]);
                break;
            } else if inside {
                out.push_str(&self.text(node)?.content);
            }
        }
        Some(out)
    }

    /// Closest element ancestor of the range's deepest common container.
    pub fn range_owner_element(&self, range: &DomRange) -> Option<NodeId> {
        if !self.range_is_attached(range) {
            return None;
        }
        let common = if range.start.node == range.end.node {
            range.start.node
        } else {
            let chain_a = self.ancestor_chain(range.start.node);
            let chain_b = self.ancestor_chain(range.end.node);
            let mut common = self.root;
            for (a, b) in chain_a.iter().zip(chain_b.iter()) {
                if a != b {
                    break;
                }
                common = *a;
            }
            common
        };
        if self.text(common).is_some() {
            self.parent(common)
        } else {
            Some(common)
        }
    }

    fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Deletes the content covered by an attached, non-collapsed range and
    /// returns the resulting caret at the former start boundary.
    ///
    /// Text nodes strictly between the boundaries are emptied in place; the
    /// surrounding element structure is left untouched.
    pub fn delete_range_contents(&mut self, range: &DomRange) -> Option<RangeBoundary> {
        if !self.range_is_attached(range) || range.is_collapsed() {
            return None;
        }
        if range.start.node == range.end.node {
            let node = range.start.node;
            let content = self.text(node)?.content.clone();
            let mut next = String::with_capacity(content.len());
            next.push_str(&content[..range.start.offset]);
            next.push_str(&content[range.end.offset..]);
            self.set_text(node, next).ok()?;
            return Some(RangeBoundary::new(node, range.start.offset));
        }

        let ordered = self.text_nodes_in_order(self.root);
        let mut inside = false;
        for node in ordered {
            if node == range.start.node {
                let content = self.text(node)?.content[..range.start.offset].to_owned();
                self.set_text(node, content).ok()?;
                inside = true;
            } else if node == range.end.node {
                let content = self.text(node)?.content[range.end.offset..].to_owned();
                self.set_text(node, content).ok()?;
                break;
            } else if inside {
                self.set_text(node, String::new()).ok()?;
            }
        }
        Some(RangeBoundary::new(range.start.node, range.start.offset))
    }

    /// Inserts `content` as a fresh text node at a caret inside a text node,
    /// splitting the node when the caret falls mid-content. Returns the new
    /// node's id.
    pub fn insert_text_at(&mut self, caret: RangeBoundary, content: &str) -> Option<NodeId> {
        if !self.boundary_is_valid(caret) {
            return None;
        }
        let host = caret.node;
        let parent = self.parent(host)?;
        let existing = self.text(host)?.content.clone();

        let inserted = self.create_text(content);
        if caret.offset == existing.len() {
            self.insert_after(parent, inserted, host)?;
        } else if caret.offset == 0 {
            self.insert_before(parent, inserted, host).ok()?;
        } else {
            let tail = self.create_text(existing[caret.offset..].to_owned());
            self.set_text(host, existing[..caret.offset].to_owned()).ok()?;
            self.insert_after(parent, inserted, host)?;
            self.insert_after(parent, tail, inserted)?;
        }
        Some(inserted)
    }

    fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Option<()> {
        let data = self.element(parent)?;
        let position = data.children.iter().position(|id| *id == reference)?;
        match data.children.get(position + 1).copied() {
            Some(next) => self.insert_before(parent, child, next).ok(),
            None => self.append_child(parent, child).ok(),
        }
    }

    // --- traversal & serialization ---

    /// All live text nodes under `scope` in document order.
    pub fn text_nodes_in_order(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(current) = stack.pop() {
            match self.node(current) {
                Some(Node::Element(data)) => {
                    stack.extend(data.children.iter().rev().copied());
                }
                Some(Node::Text(_)) => out.push(current),
                None => {}
            }
        }
        out
    }

    /// Text nodes under `scope` in document order, visiting no deeper than
    /// `max_depth` levels below it.
    pub fn text_nodes_bounded(&self, scope: NodeId, max_depth: usize) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(scope, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            match self.node(current) {
                Some(Node::Element(data)) => {
                    if depth < max_depth {
                        for child in data.children.iter().rev() {
                            stack.push((*child, depth + 1));
                        }
                    }
                }
                Some(Node::Text(_)) => out.push(current),
                None => {}
            }
        }
        out
    }

    /// Flattened text of the element's subtree, like a `textContent` read.
    pub fn text_content(&self, element: NodeId) -> Option<String> {
        self.element(element)?;
        let mut out = String::new();
        for node in self.text_nodes_in_order(element) {
            if let Some(data) = self.text(node) {
                out.push_str(&data.content);
            }
        }
        Some(out)
    }

    /// Serialized inner content of the element: text children entity-escaped,
    /// element children as `<tag>…</tag>`.
    pub fn inner_markup(&self, element: NodeId) -> Option<String> {
        let data = self.element(element)?;
        let mut out = String::new();
        for child in data.children() {
            self.serialize_into(*child, &mut out);
        }
        Some(out)
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Some(Node::Element(data)) => {
                out.push('<');
                out.push_str(&data.tag);
                out.push('>');
                for child in data.children.clone() {
                    self.serialize_into(child, out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
            Some(Node::Text(data)) => escape_into(&data.content, out),
            None => {}
        }
    }

    /// Whether every direct child of the element is a text node, i.e. its
    /// serialized inner content carries no markup.
    pub fn has_only_text_children(&self, element: NodeId) -> bool {
        let Some(data) = self.element(element) else {
            return false;
        };
        data.children
            .iter()
            .all(|child| self.text(*child).is_some())
    }

    /// Replaces the element's children with a single text node holding
    /// `content`, like a `textContent` assignment. Returns the new node.
    pub fn set_text_children(
        &mut self,
        element: NodeId,
        content: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        if self.element(element).is_none() {
            return Err(DomError::NotAnElement { node: element });
        }
        let children: Vec<NodeId> = self.element(element).map(|d| d.children.to_vec()).unwrap_or_default();
        for child in children {
            self.remove(child)?;
        }
        let text = self.create_text(content);
        self.append_child(element, text)?;
        Ok(text)
    }

    // --- editability ---

    /// Nearest editable element at or above `id`: an input field or an
    /// element marked editable. The walk is depth-bounded.
    pub fn closest_editable(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(node) = current {
            if depth > MAX_EDITABLE_SCAN_DEPTH {
                return None;
            }
            if let Some(data) = self.element(node) {
                if data.input.is_some() || data.editable {
                    return Some(node);
                }
            }
            current = self.parent(node);
            depth += 1;
        }
        None
    }

    // --- synthetic events ---

    pub fn emit(&mut self, target: NodeId, kind: SyntheticEventKind) {
        self.events.push(SyntheticEvent { target, kind });
    }

    pub fn events(&self) -> &[SyntheticEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SyntheticEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Whether `start..end` is an ordered span inside `value` with both ends on
/// char boundaries.
pub(crate) fn span_on_boundaries(value: &str, start: usize, end: usize) -> bool {
    start <= end
        && end <= value.len()
        && value.is_char_boundary(start)
        && value.is_char_boundary(end)
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
