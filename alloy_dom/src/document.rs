// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core element tree: structure, attributes, focus and traversal.

use hashbrown::HashMap;

use crate::selector::Selector;
use crate::types::{Direction, ElementId};

/// Tag used for text nodes created with [`Document::create_text`].
pub const TEXT_TAG: &str = "#text";

/// An in-memory element tree rooted at a `body` element.
///
/// Elements are created detached and become part of the rendered page once
/// they are appended somewhere below [`Document::body`]. Removing an element
/// only detaches it; [`Document::destroy`] frees it and its subtree.
///
/// ## Example
///
/// ```rust
/// use alloy_dom::Document;
///
/// let mut doc = Document::new();
/// let list = doc.create_element("ul");
/// let item = doc.create_element("li");
/// doc.add_class(item, "item");
/// doc.append_child(list, item);
/// assert!(!doc.in_body(item));
///
/// doc.append_child(doc.body(), list);
/// assert!(doc.in_body(item));
/// assert_eq!(doc.descendants(list, ".item"), vec![item]);
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: ElementId,
    focused: Option<ElementId>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    value: Option<String>,
    inner_html: Option<String>,
}

impl Element {
    fn new(generation: u32, tag: &str) -> Self {
        Self {
            generation,
            tag: tag.to_owned(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            styles: HashMap::new(),
            value: None,
            inner_html: None,
        }
    }
}

impl Document {
    /// Create a document holding only an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: ElementId::new(0, 1),
            focused: None,
        };
        doc.body = doc.create_element("body");
        doc
    }

    /// The root of the rendered page.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Element::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Element::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> ElementId {
        let id = self.create_element(TEXT_TAG);
        self.node_mut(id).inner_html = Some(text.to_owned());
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.is_alive(parent) || !self.is_alive(child) || parent == child {
            return;
        }
        if self.is_ancestor(child, parent) {
            return;
        }
        self.remove(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Insert `child` at `index` among `parent`'s children (clamped).
    pub fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        if !self.is_alive(parent) || !self.is_alive(child) || parent == child {
            return;
        }
        if self.is_ancestor(child, parent) {
            return;
        }
        self.remove(child);
        let children = &mut self.node_mut(parent).children;
        let at = index.min(children.len());
        children.insert(at, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Detach an element from its parent. The element stays alive.
    pub fn remove(&mut self, id: ElementId) {
        if let Some(parent) = self.parent_of(id) {
            self.node_mut(parent).children.retain(|c| *c != id);
            self.node_mut(id).parent = None;
        }
        if self.focused.is_some_and(|f| !self.in_body(f)) {
            self.focused = None;
        }
    }

    /// Detach and free an element and its whole subtree.
    pub fn destroy(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        self.remove(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.node_mut(child).parent = None;
            self.destroy(child);
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Remove every child of `id`, leaving them alive and detached.
    pub fn clear_children(&mut self, id: ElementId) -> Vec<ElementId> {
        let children = self.children_of(id).to_vec();
        for &c in &children {
            self.remove(c);
        }
        children
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node_opt(id).map(|n| n.tag.as_str())
    }

    /// Returns the parent of an element if live, or `None` for detached or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of an element, or an empty slice if the element is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent_of(p);
        }
        out
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Returns true if the element is connected to [`Document::body`].
    pub fn in_body(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.is_ancestor(self.body, id)
    }

    /// Returns true if the element is connected and neither it nor an
    /// ancestor has `display: none`.
    pub fn is_visible(&self, id: ElementId) -> bool {
        if !self.in_body(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            if self.style(c, "display") == Some("none") {
                return false;
            }
            cur = self.parent_of(c);
        }
        true
    }

    /// Text direction inherited through the `direction` style.
    pub fn direction(&self, id: ElementId) -> Direction {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.style(c, "direction") {
                Some("rtl") => return Direction::Rtl,
                Some("ltr") => return Direction::Ltr,
                _ => cur = self.parent_of(c),
            }
        }
        Direction::Ltr
    }

    /// Get the next element in depth-first traversal order.
    ///
    /// Returns `None` if no next element exists or if the current element is stale.
    pub fn next_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Get the previous element in reverse depth-first traversal order.
    pub fn prev_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(mut node) = self.prev_sibling(current) {
            while let Some(&last) = self.node(node).children.last() {
                node = last;
            }
            return Some(node);
        }
        self.parent_of(current)
    }

    fn next_sibling(&self, node: ElementId) -> Option<ElementId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: ElementId) -> Option<ElementId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    // --- attributes, classes, styles ---

    /// Attribute value.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    /// Returns true if the attribute is set.
    pub fn has_attr(&self, id: ElementId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.attributes.remove(name);
        }
    }

    /// Classes in insertion order.
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.node_opt(id).map_or(&[], |n| &n.classes)
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && !n.classes.iter().any(|c| c == class)
        {
            n.classes.push(class.to_owned());
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.classes.retain(|c| c != class);
        }
    }

    /// Flip a class; returns true if it is now present.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.is_alive(id)
        }
    }

    /// Inline style value.
    pub fn style(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)
            .and_then(|n| n.styles.get(name))
            .map(String::as_str)
    }

    /// Set an inline style.
    pub fn set_style(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.styles.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Remove an inline style.
    pub fn remove_style(&mut self, id: ElementId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.styles.remove(name);
        }
    }

    /// Form value.
    pub fn value(&self, id: ElementId) -> Option<&str> {
        self.node_opt(id).and_then(|n| n.value.as_deref())
    }

    /// Set the form value.
    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.value = Some(value.to_owned());
        }
    }

    /// Markup or text content.
    pub fn inner_html(&self, id: ElementId) -> Option<&str> {
        self.node_opt(id).and_then(|n| n.inner_html.as_deref())
    }

    /// Replace markup content. Element children are left untouched.
    pub fn set_inner_html(&mut self, id: ElementId, html: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.inner_html = Some(html.to_owned());
        }
    }

    // --- focus ---

    /// Give focus to a connected element. Returns false if it cannot take focus.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if self.in_body(id) {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop focus if `id` holds it.
    pub fn blur(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// The focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused.filter(|f| self.is_alive(*f))
    }

    /// Returns true if focus is on `id` or inside it.
    pub fn has_focus_within(&self, id: ElementId) -> bool {
        self.focused().is_some_and(|f| self.is_ancestor(id, f))
    }

    // --- queries ---

    /// Returns true if `id` matches `selector`. Invalid selectors match nothing.
    pub fn matches(&self, id: ElementId, selector: &str) -> bool {
        Selector::parse_or_log(selector).is_some_and(|s| s.matches(self, id))
    }

    /// All descendants of `root` matching `selector`, in document order.
    pub fn descendants(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(sel) = Selector::parse_or_log(selector) else {
            return Vec::new();
        };
        self.descendants_matching(root, &sel)
    }

    /// All descendants of `root` matching a compiled selector, in document order.
    pub fn descendants_matching(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children_of(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if selector.matches(self, id) {
                out.push(id);
            }
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        out
    }

    /// First descendant of `root` matching `selector`.
    pub fn descendant(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        self.descendants(root, selector).into_iter().next()
    }

    /// Nearest element matching `selector`, starting at `start` itself and
    /// climbing, but never above `boundary`.
    pub fn closest(
        &self,
        start: ElementId,
        selector: &str,
        boundary: Option<ElementId>,
    ) -> Option<ElementId> {
        let sel = Selector::parse_or_log(selector)?;
        let mut cur = Some(start);
        while let Some(c) = cur {
            if sel.matches(self, c) {
                return Some(c);
            }
            if Some(c) == boundary {
                return None;
            }
            cur = self.parent_of(c);
        }
        None
    }

    /// Short tag-and-attributes description, for diagnostics.
    pub fn describe(&self, id: ElementId) -> String {
        let Some(n) = self.node_opt(id) else {
            return format!("<stale {id:?}>");
        };
        let mut out = format!("<{}", n.tag);
        if !n.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", n.classes.join(" ")));
        }
        let mut attrs: Vec<_> = n.attributes.iter().collect();
        attrs.sort();
        for (k, v) in attrs {
            out.push_str(&format!(" {k}=\"{v}\""));
        }
        out.push('>');
        out
    }

    // --- internals ---

    fn node(&self, id: ElementId) -> &Element {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Element {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Element> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(doc: &mut Document, n: usize) -> (ElementId, Vec<ElementId>) {
        let ul = doc.create_element("ul");
        let items = (0..n)
            .map(|_| {
                let li = doc.create_element("li");
                doc.append_child(ul, li);
                li
            })
            .collect();
        doc.append_child(doc.body(), ul);
        (ul, items)
    }

    #[test]
    fn destroyed_ids_do_not_alias_new_elements() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        doc.destroy(a);
        let b = doc.create_element("div");
        assert_eq!(a.idx(), b.idx(), "slot is reused");
        assert!(!doc.is_alive(a));
        assert!(doc.is_alive(b));
    }

    #[test]
    fn destroy_frees_subtree_and_focus() {
        let mut doc = Document::new();
        let (ul, items) = list(&mut doc, 2);
        assert!(doc.focus(items[1]));
        doc.destroy(ul);
        assert!(!doc.is_alive(items[0]));
        assert_eq!(doc.focused(), None);
        assert!(doc.children_of(doc.body()).is_empty());
    }

    #[test]
    fn detached_elements_cannot_take_focus() {
        let mut doc = Document::new();
        let d = doc.create_element("div");
        assert!(!doc.focus(d));
        doc.append_child(doc.body(), d);
        assert!(doc.focus(d));
        doc.remove(d);
        assert_eq!(doc.focused(), None, "removing the focused element drops focus");
    }

    #[test]
    fn depth_first_traversal_is_symmetric() {
        let mut doc = Document::new();
        let (ul, items) = list(&mut doc, 2);
        let body = doc.body();
        assert_eq!(doc.next_depth_first(body), Some(ul));
        assert_eq!(doc.next_depth_first(ul), Some(items[0]));
        assert_eq!(doc.next_depth_first(items[0]), Some(items[1]));
        assert_eq!(doc.next_depth_first(items[1]), None);
        assert_eq!(doc.prev_depth_first(items[1]), Some(items[0]));
        assert_eq!(doc.prev_depth_first(items[0]), Some(ul));
    }

    #[test]
    fn visibility_and_direction_inherit() {
        let mut doc = Document::new();
        let (ul, items) = list(&mut doc, 1);
        assert!(doc.is_visible(items[0]));
        doc.set_style(ul, "display", "none");
        assert!(!doc.is_visible(items[0]));
        assert_eq!(doc.direction(items[0]), Direction::Ltr);
        doc.set_style(doc.body(), "direction", "rtl");
        assert_eq!(doc.direction(items[0]), Direction::Rtl);
    }

    #[test]
    fn append_refuses_cycles() {
        let mut doc = Document::new();
        let (ul, items) = list(&mut doc, 1);
        doc.append_child(items[0], ul);
        assert_eq!(doc.parent_of(ul), Some(doc.body()));
    }

    #[test]
    fn closest_respects_boundary() {
        let mut doc = Document::new();
        let (ul, items) = list(&mut doc, 1);
        doc.add_class(doc.body(), "root");
        assert_eq!(doc.closest(items[0], "ul", None), Some(ul));
        assert_eq!(doc.closest(items[0], ".root", Some(ul)), None);
        assert_eq!(doc.closest(items[0], ".root", None), Some(doc.body()));
    }
}
