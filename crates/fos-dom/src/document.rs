//! Document - High-level document API
//!
//! `Document` is a cheap handle: clones share one tree and one listener
//! registry. Borrows of either are never held across a listener call, so
//! listeners may mutate the document they receive.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::{
    DomResult, DomTree, Event, EventListenerRegistry, Listener, ListenerId, NodeId, SelectorList,
};

struct DocumentInner {
    url: String,
    tree: RefCell<DomTree>,
    listeners: RefCell<EventListenerRegistry>,
}

/// HTML Document
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    /// Create a document with an `html > (head, body)` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        // Fresh ids under a fresh root cannot violate hierarchy rules
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);
        Self::from_tree(url, tree)
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::from_tree(url, DomTree::new())
    }

    /// Wrap an already built tree
    pub fn from_tree(url: &str, tree: DomTree) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                url: url.to_string(),
                tree: RefCell::new(tree),
                listeners: RefCell::new(EventListenerRegistry::new()),
            }),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Access the DOM tree
    pub fn tree(&self) -> Ref<'_, DomTree> {
        self.inner.tree.borrow()
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&self) -> RefMut<'_, DomTree> {
        self.inner.tree.borrow_mut()
    }

    /// Whether two handles refer to the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        let tree = self.tree();
        tree.children(tree.root())
            .find(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    /// Get `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.child_of_html("head")
    }

    /// Get `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.child_of_html("body")
    }

    fn child_of_html(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        let tree = self.tree();
        tree.children(html)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.tag_name == tag))
            .map(|(id, _)| id)
    }

    // Tree

    pub fn create_element(&self, tag_name: &str) -> NodeId {
        self.tree_mut().create_element(tag_name)
    }

    pub fn create_text(&self, content: &str) -> NodeId {
        self.tree_mut().create_text(content)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree_mut().append_child(parent, child)
    }

    pub fn prepend_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree_mut().prepend_child(parent, child)
    }

    pub fn insert_before(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        self.tree_mut().insert_before(parent, child, reference)
    }

    /// Remove a node from its parent. Listeners stay registered so the
    /// node can be reinserted.
    pub fn remove(&self, node: NodeId) -> DomResult<()> {
        self.tree_mut().detach(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree().parent(node)
    }

    /// Child ids of `node`
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree().children(node).map(|(id, _)| id).collect()
    }

    // Attributes and classes

    pub fn attribute(&self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        self.tree().attribute(node, name)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree_mut().set_attribute(node, name, value)
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> DomResult<()> {
        self.tree_mut().remove_attribute(node, name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> DomResult<bool> {
        self.tree().has_attribute(node, name)
    }

    pub fn add_class(&self, node: NodeId, class: &str) -> DomResult<()> {
        self.tree_mut().add_class(node, class)
    }

    pub fn remove_class(&self, node: NodeId, class: &str) -> DomResult<()> {
        self.tree_mut().remove_class(node, class)
    }

    pub fn toggle_class(&self, node: NodeId, class: &str) -> DomResult<bool> {
        self.tree_mut().toggle_class(node, class)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> DomResult<bool> {
        self.tree().has_class(node, class)
    }

    // Dataset, text, style

    pub fn data(&self, node: NodeId, key: &str) -> DomResult<Option<String>> {
        self.tree().data(node, key)
    }

    pub fn set_data(&self, node: NodeId, key: &str, value: &str) -> DomResult<()> {
        self.tree_mut().set_data(node, key, value)
    }

    pub fn text_content(&self, node: NodeId) -> DomResult<String> {
        self.tree().text_content(node)
    }

    pub fn set_text_content(&self, node: NodeId, text: &str) -> DomResult<()> {
        self.tree_mut().set_text_content(node, text)
    }

    pub fn style_property(&self, node: NodeId, property: &str) -> DomResult<String> {
        self.tree().style_property(node, property)
    }

    pub fn set_style_property(&self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.tree_mut().set_style_property(node, property, value)
    }

    // Queries

    /// Matching elements under the document root, in document order
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let tree = self.tree();
        tree.query_selector_all(tree.root(), selector)
    }

    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        let tree = self.tree();
        tree.query_selector(tree.root(), selector)
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        self.tree().matches(node, selector)
    }

    /// Match against an already parsed selector. Non-elements and stale
    /// ids never match.
    pub fn matches_selector(&self, node: NodeId, selector: &SelectorList) -> bool {
        selector.matches(&self.tree(), node)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        self.tree().closest(node, selector)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree();
        tree.descendants(tree.root())
            .into_iter()
            .find(|&node| tree.element(node).is_ok_and(|e| e.id() == Some(id)))
    }

    // Events

    /// Register a listener on `node`
    pub fn add_event_listener(&self, node: NodeId, event_type: &str, listener: Listener) -> DomResult<ListenerId> {
        self.tree().node(node)?;
        let id = self.inner.listeners.borrow_mut().add(node, event_type, listener);
        tracing::debug!(%node, event_type, listener = id.raw(), "listener added");
        Ok(id)
    }

    /// Unregister a listener, returning whether it was registered
    pub fn remove_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(node, event_type, id)
    }

    /// Number of listeners on `node` for `event_type`
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.inner.listeners.borrow().count(node, event_type)
    }

    /// Dispatch `event` at `target`. Returns `false` if a listener
    /// prevented the default action.
    pub fn dispatch_event(&self, target: NodeId, mut event: Event) -> DomResult<bool> {
        let path: Vec<NodeId> = {
            let tree = self.tree();
            tree.node(target)?;
            std::iter::once(target).chain(tree.ancestors(target)).collect()
        };
        let path = if event.bubbles() { &path[..] } else { &path[..1] };

        tracing::debug!(%target, event_type = event.event_type(), path = path.len(), "dispatching event");
        event.begin(target);

        for &node in path {
            event.enter(node);
            let snapshot = self.inner.listeners.borrow().snapshot(node, event.event_type());
            for (id, listener) in snapshot {
                // Listeners removed by an earlier listener in this pass are skipped
                if !self.inner.listeners.borrow().contains(node, event.event_type(), id) {
                    continue;
                }
                tracing::trace!(%node, listener = id.raw(), "invoking listener");
                listener(self, &mut event);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.finish();
        Ok(!event.is_default_prevented())
    }

    /// Dispatch a bubbling, cancelable `click`
    pub fn click(&self, node: NodeId) -> DomResult<bool> {
        self.dispatch_event(node, Event::bubbling("click"))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.inner.url)
            .field("nodes", &self.inner.tree.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomError, EventPhase};
    use std::cell::RefCell;

    fn record(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> Listener {
        let log = Rc::clone(log);
        Rc::new(move |_: &Document, event: &mut Event| {
            log.borrow_mut().push(format!("{label}@{}", event.current_target()));
        })
    }

    fn fixture() -> (Document, NodeId, NodeId) {
        let doc = Document::new("about:blank");
        let body = doc.body().unwrap();
        let list = doc.create_element("ul");
        let item = doc.create_element("li");
        doc.append_child(body, list).unwrap();
        doc.append_child(list, item).unwrap();
        (doc, list, item)
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.url(), "https://example.com/");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.parent(doc.head().unwrap()), Some(html));
        assert_eq!(doc.parent(doc.body().unwrap()), Some(html));
        assert_eq!(Document::empty("x").body(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let doc = Document::default();
        let other = doc.clone();
        let div = other.create_element("div");
        other.append_child(other.body().unwrap(), div).unwrap();
        other.set_attribute(div, "id", "shared").unwrap();
        assert!(doc.ptr_eq(&other));
        assert_eq!(doc.get_element_by_id("shared"), Some(div));
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let (doc, list, item) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(item, "click", record(&log, "item")).unwrap();
        doc.add_event_listener(list, "click", record(&log, "list")).unwrap();

        assert!(doc.click(item).unwrap());
        assert_eq!(*log.borrow(), vec![format!("item@{item}"), format!("list@{list}")]);
    }

    #[test]
    fn test_non_bubbling_event_stays_at_target() {
        let (doc, list, item) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(list, "focus", record(&log, "list")).unwrap();
        doc.dispatch_event(item, Event::new("focus")).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_stop_propagation() {
        let (doc, list, item) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(item, "click", Rc::new(|_: &Document, e: &mut Event| e.stop_propagation()))
            .unwrap();
        doc.add_event_listener(item, "click", record(&log, "item")).unwrap();
        doc.add_event_listener(list, "click", record(&log, "list")).unwrap();

        doc.click(item).unwrap();
        assert_eq!(*log.borrow(), vec![format!("item@{item}")]);
    }

    #[test]
    fn test_stop_immediate_propagation() {
        let (doc, _list, item) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(
            item,
            "click",
            Rc::new(|_: &Document, e: &mut Event| e.stop_immediate_propagation()),
        )
        .unwrap();
        doc.add_event_listener(item, "click", record(&log, "item")).unwrap();
        doc.click(item).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_prevent_default_result() {
        let (doc, _list, item) = fixture();
        doc.add_event_listener(item, "click", Rc::new(|_: &Document, e: &mut Event| e.prevent_default()))
            .unwrap();
        assert!(!doc.click(item).unwrap());
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let (doc, list, item) = fixture();
        doc.add_event_listener(
            list,
            "click",
            Rc::new(|doc: &Document, e: &mut Event| {
                assert_eq!(e.phase(), EventPhase::Bubbling);
                doc.add_class(e.target(), "clicked").unwrap();
                let extra = doc.create_element("li");
                doc.append_child(e.current_target(), extra).unwrap();
            }),
        )
        .unwrap();

        doc.click(item).unwrap();
        assert!(doc.has_class(item, "clicked").unwrap());
        assert_eq!(doc.children(list).len(), 2);
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let (doc, _list, item) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&victim);
        doc.add_event_listener(
            item,
            "click",
            Rc::new(move |doc: &Document, e: &mut Event| {
                if let Some(id) = *slot.borrow() {
                    doc.remove_event_listener(e.current_target(), "click", id);
                }
            }),
        )
        .unwrap();
        let id = doc.add_event_listener(item, "click", record(&log, "victim")).unwrap();
        *victim.borrow_mut() = Some(id);

        doc.click(item).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(doc.listener_count(item, "click"), 1);
    }

    #[test]
    fn test_stale_target() {
        let doc = Document::default();
        let stale = NodeId::from_raw(9_999);
        assert_eq!(doc.click(stale), Err(DomError::NotFound(stale)));
        let listener: Listener = Rc::new(|_: &Document, _: &mut Event| {});
        assert_eq!(doc.add_event_listener(stale, "click", listener), Err(DomError::NotFound(stale)));
    }
}
