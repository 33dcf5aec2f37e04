// ABOUTME: Arena-backed mutable document tree addressed by stable NodeId handles.
// ABOUTME: Structural edits (remove, unwrap, move) are no-ops on nodes already detached.

use ego_tree::{NodeId, NodeRef, Tree};

use super::node::{Element, Node};

/// A parsed document. Nodes removed from the tree stay in the arena, detached, so a
/// `NodeId` captured earlier never dangles; it just stops being [`attached`](Self::is_attached).
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            tree: Tree::new(Node::Document),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn root(&self) -> NodeRef<'_, Node> {
        self.tree.root()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.tree.get(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id).map(|n| n.value())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    /// Append `node` as the last child of `parent`. Returns `None` when `parent` is unknown.
    pub fn append(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        let mut parent = self.tree.get_mut(parent)?;
        Some(parent.append(node).id())
    }

    /// True when `id` is the root or reachable from it through parent links.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root_id();
        match self.tree.get(id) {
            Some(node) if node.id() == root => true,
            Some(node) => node.ancestors().last().is_some_and(|top| top.id() == root),
            None => false,
        }
    }

    /// Direct children of `id`, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Snapshot of every attached element named `name`, in document (pre-)order.
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|n| n.value().is_element_named(name))
            .map(|n| n.id())
            .collect()
    }

    /// Snapshot of every attached element, in document (pre-)order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|n| matches!(n.value(), Node::Element(_)))
            .map(|n| n.id())
            .collect()
    }

    /// Every attached node, in document (pre-)order, root excluded.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .skip(1)
            .map(|n| n.id())
            .collect()
    }

    /// The first attached `body` element, if the parse produced one.
    pub fn body(&self) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|n| n.value().is_element_named("body"))
            .map(|n| n.id())
    }

    /// The node whose children form the visible content: `body` if present, else the root.
    pub fn content_root(&self) -> NodeId {
        self.body().unwrap_or_else(|| self.root_id())
    }

    /// Concatenated text of every descendant text node.
    pub fn text(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|n| n.value().as_text())
            .collect()
    }

    /// True when some strict descendant of `id` is an element named `name`.
    pub fn has_descendant_named(&self, id: NodeId, name: &str) -> bool {
        self.tree.get(id).is_some_and(|n| {
            n.descendants()
                .skip(1)
                .any(|d| d.value().is_element_named(name))
        })
    }

    /// Detach `id` (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root_id() || !self.is_attached(id) {
            return false;
        }
        match self.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Replace `id` with its children at the same position, preserving their order.
    pub fn unwrap(&mut self, id: NodeId) -> bool {
        if id == self.root_id() || !self.is_attached(id) {
            return false;
        }
        // Hoisting the last child right after `id` repeatedly keeps the original order.
        for child in self.children(id).into_iter().rev() {
            if let Some(mut node) = self.tree.get_mut(id) {
                node.insert_id_after(child);
            }
        }
        self.remove(id)
    }

    /// Move `id` so it becomes the next sibling of `anchor`.
    pub fn move_after(&mut self, id: NodeId, anchor: NodeId) -> bool {
        if id == anchor
            || anchor == self.root_id()
            || !self.is_attached(anchor)
            || self.is_ancestor(id, anchor)
        {
            return false;
        }
        match self.tree.get_mut(anchor) {
            Some(mut node) => {
                node.insert_id_after(id);
                true
            }
            None => false,
        }
    }

    /// True when `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.tree
            .get(id)
            .is_some_and(|n| n.ancestors().any(|a| a.id() == ancestor))
    }
}
