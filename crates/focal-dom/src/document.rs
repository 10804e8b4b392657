//! Document - High-level document API
//!
//! Owns the tree plus the browser-side state the accessibility layer
//! depends on: which element has focus, what was scrolled into view, the
//! current text selection, and a log of mutations.

use crate::{DomError, DomEvent, DomResult, DomTree, ElementData, NodeId, Selector};

/// Options for `Document::focus`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusOptions {
    pub prevent_scroll: bool,
}

/// Selected text range inside a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    active_element: Option<NodeId>,
    selection: Option<TextSelection>,
    scroll_log: Vec<NodeId>,
    mutations: Vec<DomEvent>,
    observing: bool,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy.
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            active_element: None,
            selection: None,
            scroll_log: Vec::new(),
            mutations: Vec::new(),
            observing: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.element(node)
    }

    fn require_element(&self, node: NodeId) -> DomResult<&ElementData> {
        match self.tree.get(node) {
            None => Err(DomError::NodeNotFound(node)),
            Some(n) => n.as_element().ok_or(DomError::NotAnElement(node)),
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached element with attributes and optional text
    pub fn create_element_with(&mut self, tag: &str, attrs: &[(&str, &str)], text: Option<&str>) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Some(element) = self.tree.element_mut(id) {
            for (name, value) in attrs {
                element.attrs.set(name, value);
            }
        }
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let text_node = self.tree.create_text(text);
            let _ = self.tree.append_child(id, text_node);
        }
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        self.tree.insert_before(parent, child, reference)?;
        self.record(DomEvent::node_inserted(child, parent));
        Ok(child)
    }

    /// Remove a child. Focus inside the removed subtree falls back to the body.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.remove_child(parent, child)?;
        self.record(DomEvent::node_removed(child, parent));
        if let Some(active) = self.active_element {
            if self.tree.contains(child, active) {
                tracing::debug!("Focused node {} removed, focus falls back to body", active);
                self.active_element = None;
            }
        }
        if let Some(selection) = self.selection {
            if self.tree.contains(child, selection.node) {
                self.selection = None;
            }
        }
        Ok(child)
    }

    /// Detach a node from wherever it is attached
    pub fn remove(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self.tree.get(node).ok_or(DomError::NodeNotFound(node))?.parent;
        if !parent.is_valid() {
            return Ok(node);
        }
        self.remove_child(parent, node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    // ------------------------------------------------------------------
    // Attributes and text
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.require_element(node)?;
        let old = self
            .tree
            .element_mut(node)
            .and_then(|e| e.attrs.set(name, value));
        if old.as_deref() != Some(value) {
            self.record(DomEvent::attr_modified(node, name, old.as_deref(), Some(value)));
        }
        Ok(())
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        self.require_element(node)?;
        let old = self.tree.element_mut(node).and_then(|e| e.attrs.remove(name));
        match old {
            Some(old) => {
                self.record(DomEvent::attr_modified(node, name, Some(&old), None));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set or remove a boolean attribute
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str, on: bool) -> DomResult<()> {
        if on {
            if !self.has_attribute(node, name) {
                self.set_attribute(node, name, "")?;
            }
        } else {
            self.remove_attribute(node, name)?;
        }
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    /// Replace all children with a single text node.
    ///
    /// Always records a character-data mutation, even when the text is
    /// unchanged, matching `textContent` assignment.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        self.require_element(node)?;
        let old = self.tree.text_content(node);
        let children: Vec<NodeId> = self.tree.children(node).map(|(id, _)| id).collect();
        for child in children {
            self.tree.remove_child(node, child)?;
            if let Some(active) = self.active_element {
                if self.tree.contains(child, active) {
                    self.active_element = None;
                }
            }
        }
        if !text.is_empty() {
            let text_node = self.tree.create_text(text);
            self.tree.append_child(node, text_node)?;
        }
        self.record(DomEvent::char_data_modified(node, &old, text));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First connected element with the given id, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.tree.element(n).and_then(ElementData::id) == Some(id))
    }

    /// First descendant of `scope` matching the selector
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(scope, &selector).next())
    }

    /// All descendants of `scope` matching the selector, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(scope, &selector).collect())
    }

    /// Descendants matching a parsed selector
    pub fn select<'a>(&'a self, scope: NodeId, selector: &'a Selector) -> impl Iterator<Item = NodeId> + 'a {
        self.tree
            .descendants(scope)
            .filter(move |&n| self.tree.element(n).is_some_and(|e| selector.matches(e)))
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.tree.element(node).is_some_and(|e| selector.matches(e))
    }

    // ------------------------------------------------------------------
    // Rendering and focus
    // ------------------------------------------------------------------

    /// Connected and not hidden by itself or an ancestor.
    ///
    /// This is the model's equivalent of a non-null `offsetParent`.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        if !self.tree.is_connected(node) {
            return false;
        }
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .filter_map(|n| self.tree.element(n))
            .all(|e| !hides_content(e))
    }

    /// Whether `focus()` would succeed on this node
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(element) = self.tree.element(node) else {
            return false;
        };
        if element.is_disabled() || !self.is_rendered(node) {
            return false;
        }
        element.is_natively_focusable() || element.tab_index().is_some()
    }

    /// The focused element, or `<body>` when nothing is focused
    pub fn active_element(&self) -> NodeId {
        match self.active_element {
            Some(node) if self.tree.is_connected(node) => node,
            _ => self.body_element,
        }
    }

    pub fn has_focus(&self, node: NodeId) -> bool {
        self.active_element() == node
    }

    /// Move focus. Returns `false` and leaves focus alone when the node
    /// cannot be focused.
    pub fn focus(&mut self, node: NodeId, options: FocusOptions) -> bool {
        if !self.is_focusable(node) {
            tracing::debug!("Node {} is not focusable", node);
            return false;
        }
        if self.active_element != Some(node) {
            self.selection = None;
        }
        self.active_element = Some(node);
        if !options.prevent_scroll {
            self.scroll_into_view(node);
        }
        true
    }

    pub fn blur(&mut self) {
        self.active_element = None;
        self.selection = None;
    }

    pub fn scroll_into_view(&mut self, node: NodeId) {
        self.scroll_log.push(node);
    }

    /// Nodes scrolled into view, oldest first
    pub fn scroll_log(&self) -> &[NodeId] {
        &self.scroll_log
    }

    /// Select the whole value of a text field. Returns `false` for other elements.
    pub fn select_text(&mut self, node: NodeId) -> bool {
        let Some(element) = self.tree.element(node) else {
            return false;
        };
        if !element.is_text_field() {
            return false;
        }
        let len = if element.is("textarea") {
            self.tree.text_content(node).chars().count()
        } else {
            element.get_attr("value").map_or(0, |v| v.chars().count())
        };
        self.selection = Some(TextSelection { node, start: 0, end: len });
        true
    }

    pub fn selection(&self) -> Option<TextSelection> {
        self.selection
    }

    // ------------------------------------------------------------------
    // Mutation records
    // ------------------------------------------------------------------

    /// Start or stop recording mutations
    pub fn observe_mutations(&mut self, on: bool) {
        self.observing = on;
    }

    pub fn mutations(&self) -> &[DomEvent] {
        &self.mutations
    }

    pub fn take_mutations(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.mutations)
    }

    fn record(&mut self, event: DomEvent) {
        if self.observing {
            self.mutations.push(event);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

fn hides_content(element: &ElementData) -> bool {
    if element.has_attr("hidden") {
        return true;
    }
    element.get_attr("style").is_some_and(|style| {
        style.split(';').any(|decl| {
            let mut parts = decl.splitn(2, ':');
            let prop = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            prop.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
        })
    })
}
