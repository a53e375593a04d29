//! Document - High-level document API

use crate::{DOMRect, DOMTokenList, DomError, DomResult, DomTree, NodeId};

/// Default viewport used by `Document::new`
const DEFAULT_CLIENT_WIDTH: f64 = 1024.0;
const DEFAULT_CLIENT_HEIGHT: f64 = 768.0;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// `documentElement.clientWidth`: viewport width excluding the scrollbar
    client_width: f64,
    /// `documentElement.clientHeight`
    client_height: f64,
    /// Focused element, if any
    focused: Option<NodeId>,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under the root cannot violate the hierarchy
        let root = tree.root();
        for (parent, child) in [(root, html), (html, head), (html, body)] {
            if let Err(err) = tree.append_child(parent, child) {
                tracing::warn!(%err, "failed to build document skeleton");
            }
        }

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            client_width: DEFAULT_CLIENT_WIDTH,
            client_height: DEFAULT_CLIENT_HEIGHT,
            focused: None,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn client_width(&self) -> f64 {
        self.client_width
    }

    pub fn client_height(&self) -> f64 {
        self.client_height
    }

    /// Set the root element's client size (viewport minus scrollbars)
    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.client_width = width;
        self.client_height = height;
    }

    /// Create an element and append it to `parent`
    pub fn create_element_in(&mut self, parent: NodeId, tag_name: &str) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag_name);
        self.tree.append_child(parent, id)
    }

    /// Create an element with a class attribute and layout box, appended to `parent`
    pub fn create_box(&mut self, parent: NodeId, tag_name: &str, class: &str, rect: DOMRect) -> DomResult<NodeId> {
        let id = self.create_element_in(parent, tag_name)?;
        self.class_list_mut(id)?.add(&class.split_whitespace().collect::<Vec<_>>());
        self.set_rect(id, rect)?;
        Ok(id)
    }

    /// Mutable class list of an element
    pub fn class_list_mut(&mut self, id: NodeId) -> DomResult<&mut DOMTokenList> {
        let node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        node.as_element_mut()
            .map(|e| &mut e.class_list)
            .ok_or(DomError::NotAnElement(id))
    }

    /// Set the `id` attribute
    pub fn set_id(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        let elem = node.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        elem.id = Some(value.to_string());
        Ok(())
    }

    /// Set the layout box of an element
    pub fn set_rect(&mut self, id: NodeId, rect: DOMRect) -> DomResult<()> {
        let node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        let elem = node.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        elem.rect = Some(rect);
        Ok(())
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| {
                self.tree
                    .get(node)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.id.as_deref() == Some(id))
            })
    }

    /// `elementFromPoint`: the last element in tree order whose layout box
    /// contains the point, i.e. the topmost painted one. Points that hit no
    /// laid-out element resolve to the document element.
    pub fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        if !self.tree.is_connected(self.html_element) {
            return None;
        }

        let hit = self
            .tree
            .descendants(self.html_element)
            .into_iter()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .and_then(|n| n.as_element())
                    .and_then(|e| e.rect)
                    .is_some_and(|rect| rect.contains_point(x, y))
            })
            .last();

        hit.or(Some(self.html_element))
    }

    /// `document.activeElement`: the focused element, or `<body>` when
    /// nothing is focused or the focused element was removed.
    pub fn active_element(&self) -> Option<NodeId> {
        match self.focused {
            Some(id) if self.tree.is_connected(id) => Some(id),
            _ if self.tree.is_connected(self.body_element) => Some(self.body_element),
            _ => None,
        }
    }

    /// Move focus to an element
    pub fn focus(&mut self, id: NodeId) -> DomResult<()> {
        let node = self.tree.get(id).ok_or(DomError::NotFound(id))?;
        if !node.is_element() {
            return Err(DomError::NotAnElement(id));
        }
        self.focused = Some(id);
        Ok(())
    }

    /// Clear focus
    pub fn blur(&mut self) {
        self.focused = None;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        let tree = doc.tree();
        assert_eq!(tree.parent(doc.document_element()), Some(tree.root()));
        assert_eq!(tree.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(tree.parent(doc.head()), Some(doc.document_element()));
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_element_from_point_topmost() {
        let mut doc = Document::default();
        let body = doc.body();
        let panel = doc.create_box(body, "div", "panel", DOMRect::from_xywh(0.0, 0.0, 200.0, 200.0)).unwrap();
        let button = doc.create_box(panel, "button", "", DOMRect::from_xywh(10.0, 10.0, 50.0, 20.0)).unwrap();

        assert_eq!(doc.element_from_point(20.0, 15.0), Some(button));
        assert_eq!(doc.element_from_point(150.0, 150.0), Some(panel));
        assert_eq!(doc.element_from_point(600.0, 600.0), Some(doc.document_element()));
    }

    #[test]
    fn test_element_from_point_skips_detached() {
        let mut doc = Document::default();
        let body = doc.body();
        let popup = doc.create_box(body, "div", "", DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();
        doc.tree_mut().remove_child(body, popup).unwrap();

        assert_eq!(doc.element_from_point(50.0, 50.0), Some(doc.document_element()));
    }

    #[test]
    fn test_active_element_defaults_to_body() {
        let mut doc = Document::default();
        assert_eq!(doc.active_element(), Some(doc.body()));

        let body = doc.body();
        let input = doc.create_element_in(body, "input").unwrap();
        doc.focus(input).unwrap();
        assert_eq!(doc.active_element(), Some(input));

        doc.tree_mut().remove_child(body, input).unwrap();
        assert_eq!(doc.active_element(), Some(body));
    }

    #[test]
    fn test_focus_rejects_text() {
        let mut doc = Document::default();
        let text = doc.tree_mut().create_text("hello");
        assert_eq!(doc.focus(text), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let body = doc.body();
        let menu = doc.create_element_in(body, "ul").unwrap();
        doc.set_id(menu, "menu").unwrap();

        assert_eq!(doc.get_element_by_id("menu"), Some(menu));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }
}
