//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only detaches it, so every id
//! handed out stays addressable for the lifetime of the tree.

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get a node, rejecting stale references
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Get element data, rejecting stale references and non-elements
    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?
            .as_element()
            .ok_or(DomError::InvalidNodeType(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is allocated up front
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(Node::element(tag_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Insert `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let first = self.node(parent)?.first_child;
        self.insert_before(parent, child, first.is_valid().then_some(first))
    }

    /// Insert `child` under `parent` before `reference` (or last when
    /// `reference` is None). An attached `child` is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.node(parent)?.is_container() {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(self.node(child)?.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        let mut reference = reference.filter(|r| r.is_valid());
        if let Some(r) = reference {
            if self.node(r)?.parent != parent {
                return Err(DomError::NotAChild);
            }
        }
        if reference == Some(child) {
            let next = self.nodes[child.index()].next_sibling;
            reference = next.is_valid().then_some(next);
        }

        self.detach(child)?;

        let (prev, next) = match reference {
            Some(r) => (self.nodes[r.index()].prev_sibling, r),
            None => (self.nodes[parent.index()].last_child, NodeId::NONE),
        };

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;
        Ok(())
    }

    /// Detach a node from its parent. Detached nodes are left untouched.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let node = self.node(id)?;
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Detach every child of `id`
    pub fn remove_children(&mut self, id: NodeId) -> DomResult<()> {
        let children: Vec<NodeId> = self.children(id).map(|(child, _)| child).collect();
        for child in children {
            self.detach(child)?;
        }
        Ok(())
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Iterate over ancestors, nearest first (exclusive of `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.parent),
        }
    }

    /// Descendants of `id` in document (preorder) order, exclusive of `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[start..].reverse();
        }
        out
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.prev_sibling;
        while let Some(node) = self.get(current) {
            if node.is_element() {
                return Some(current);
            }
            current = node.prev_sibling;
        }
        None
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.next_sibling;
        while let Some(node) = self.get(current) {
            if node.is_element() {
                return Some(current);
            }
            current = node.next_sibling;
        }
        None
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        match &self.node(id)?.data {
            NodeData::Text(text) | NodeData::Comment(text) => Ok(text.clone()),
            NodeData::Document | NodeData::Element(_) => Ok(self
                .descendants(id)
                .into_iter()
                .filter_map(|d| self.nodes[d.index()].as_text())
                .collect()),
        }
    }

    /// Replace text data, or replace all children with a single text node.
    /// An empty string leaves an element with no children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(data) | NodeData::Comment(data) => {
                *data = text.to_string();
                return Ok(());
            }
            NodeData::Document => return Ok(()),
            NodeData::Element(_) => {}
        }

        self.remove_children(id)?;
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(id, child)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tree: &DomTree, parent: NodeId) -> Vec<NodeId> {
        tree.children(parent).map(|(id, _)| id).collect()
    }

    #[test]
    fn test_append_and_prepend() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        let c = tree.create_element("li");

        tree.append_child(tree.root(), ul).unwrap();
        tree.append_child(ul, b).unwrap();
        tree.append_child(ul, c).unwrap();
        tree.prepend_child(ul, a).unwrap();

        assert_eq!(list(&tree, ul), vec![a, b, c]);
        assert_eq!(tree.get(ul).unwrap().last_child, c);
        assert_eq!(tree.parent(a), Some(ul));
    }

    #[test]
    fn test_move_between_parents() {
        let mut tree = DomTree::new();
        let left = tree.create_element("div");
        let right = tree.create_element("div");
        let item = tree.create_element("span");
        tree.append_child(left, item).unwrap();
        tree.append_child(right, item).unwrap();

        assert!(list(&tree, left).is_empty());
        assert_eq!(list(&tree, right), vec![item]);
    }

    #[test]
    fn test_detach_fixes_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p1 = tree.create_element("p");
        let p2 = tree.create_element("p");
        let p3 = tree.create_element("p");
        for p in [p1, p2, p3] {
            tree.append_child(div, p).unwrap();
        }

        tree.detach(p2).unwrap();

        assert_eq!(tree.get(p1).unwrap().next_sibling, p3);
        assert_eq!(tree.get(p3).unwrap().prev_sibling, p1);
        assert_eq!(tree.parent(p2), None);
        // detaching twice is a no-op
        tree.detach(p2).unwrap();
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let text = tree.create_text("x");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(outer, outer), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(text, inner), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(outer, NodeId::ROOT), Err(DomError::HierarchyRequest));
        assert_eq!(
            tree.insert_before(outer, text, Some(outer)),
            Err(DomError::NotAChild)
        );
    }

    #[test]
    fn test_stale_reference() {
        let mut tree = DomTree::new();
        let stale = NodeId::from_raw(999);
        assert_eq!(tree.node(stale).err(), Some(DomError::NotFound(stale)));
        assert_eq!(tree.detach(NodeId::NONE), Err(DomError::NotFound(NodeId::NONE)));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        let d = tree.create_element("d");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        tree.append_child(a, d).unwrap();

        assert_eq!(tree.descendants(tree.root()), vec![a, b, c, d]);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a, NodeId::ROOT]);
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let b = tree.create_element("b");
        let t1 = tree.create_text("Hello, ");
        let t2 = tree.create_text("World");
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();

        assert_eq!(tree.text_content(p).unwrap(), "Hello, World");

        tree.set_text_content(p, "replaced").unwrap();
        assert_eq!(tree.text_content(p).unwrap(), "replaced");
        assert_eq!(list(&tree, p).len(), 1);

        tree.set_text_content(p, "").unwrap();
        assert!(list(&tree, p).is_empty());
    }
}
