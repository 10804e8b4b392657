//! DOM Tree (arena-based allocation)
//!
//! Removed nodes stay in the arena, detached from the document, so stale
//! `NodeId`s remain valid lookups that report `is_connected() == false`.

use crate::{DomError, DomResult, ElementData, Node, NodeId};

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

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn require(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`, or at the end when `reference` is `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let parent_node = self.require(parent)?;
        if parent_node.is_text() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.require(child)?;
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.require(reference)?.parent != parent {
                return Err(DomError::NotAChild(reference, parent));
            }
            if reference == child {
                return Ok(child);
            }
        }

        self.detach(child);

        let (prev, next) = match reference {
            Some(reference) => (self.nodes[reference.index()].prev_sibling, reference),
            None => (self.nodes[parent.index()].last_child, NodeId::NONE),
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
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
        Ok(child)
    }

    /// Remove `child` from `parent`. The node and its subtree stay in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.require(parent)?;
        if self.require(child)?.parent != parent {
            return Err(DomError::NotAChild(child, parent));
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
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
    }

    /// Direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let mut cursor = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::from_fn(move || {
            if !cursor.is_valid() {
                return None;
            }
            let current = cursor;
            let node = &self.nodes[current.index()];
            cursor = node.next_sibling;
            Some((current, node))
        })
    }

    /// All descendants of `id` in document (preorder) order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            root: id,
            next,
        }
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.get(id).map_or(NodeId::NONE, |n| n.parent);
        std::iter::from_fn(move || {
            if !cursor.is_valid() {
                return None;
            }
            let current = cursor;
            cursor = self.nodes[current.index()].parent;
            Some(current)
        })
    }

    /// Inclusive containment: `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is attached to the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.contains(NodeId::ROOT, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.nodes[d.index()].as_text())
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Preorder iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }
        let node = &self.tree.nodes[current.index()];
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children_order() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        let ids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(ids, [a, b]);
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let list = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");
        tree.append_child(list, second).unwrap();
        tree.insert_before(list, first, Some(second)).unwrap();

        let ids: Vec<_> = tree.children(list).map(|(id, _)| id).collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let section = tree.create_element("section");
        let header = tree.create_element("header");
        let h1 = tree.create_element("h1");
        let p = tree.create_element("p");
        tree.append_child(root, section).unwrap();
        tree.append_child(section, header).unwrap();
        tree.append_child(header, h1).unwrap();
        tree.append_child(section, p).unwrap();

        let order: Vec<_> = tree.descendants(section).collect();
        assert_eq!(order, [header, h1, p]);
        assert_eq!(tree.descendants(h1).count(), 0);
    }

    #[test]
    fn test_remove_disconnects_subtree() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        assert!(tree.is_connected(inner));

        tree.remove_child(tree.root(), outer).unwrap();
        assert!(!tree.is_connected(inner));
        assert!(tree.contains(outer, inner));
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        let text = tree.create_text("hi");
        assert!(tree.append_child(text, outer).is_err());
        assert_eq!(
            tree.remove_child(inner, outer),
            Err(DomError::NotAChild(outer, inner))
        );
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let a = tree.create_text("Hello ");
        let em = tree.create_element("em");
        let b = tree.create_text("World");
        tree.append_child(p, a).unwrap();
        tree.append_child(p, em).unwrap();
        tree.append_child(em, b).unwrap();
        assert_eq!(tree.text_content(p), "Hello World");
    }
}
