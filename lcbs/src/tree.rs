//! Tree access needed by the sequence codec.

use indextree::{Arena, NodeId};

/// Read-only view of a rooted, ordered tree.
///
/// This is all the codec needs: the ordered children of a node and the number
/// of nodes in its subtree (the node itself included).
pub trait TreeView {
    /// Handle identifying a node in this tree.
    type Node: Copy;

    /// Children of `node`, in order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Number of nodes in the subtree rooted at `node`, including `node`.
    fn subtree_size(&self, node: Self::Node) -> usize;
}

/// A simple arena-backed tree carrying one label per node.
#[derive(Debug, Clone)]
pub struct Tree<L> {
    arena: Arena<L>,
    /// The root node.
    pub root: NodeId,
}

impl<L> Tree<L> {
    /// Create a tree with a single root node.
    pub fn new(label: L) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(label);
        Self { arena, root }
    }

    /// Append a child as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, label: L) -> NodeId {
        let child = self.arena.new_node(label);
        parent.append(child, &mut self.arena);
        child
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> &L {
        self.arena[id].get()
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.root.descendants(&self.arena).count()
    }
}

impl<L> TreeView for Tree<L> {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    fn subtree_size(&self, node: NodeId) -> usize {
        node.descendants(&self.arena).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_children_in_order() {
        let mut tree = Tree::new("root");
        let a = tree.add_child(tree.root, "a");
        let b = tree.add_child(tree.root, "b");
        let c = tree.add_child(tree.root, "c");

        let children: Vec<_> = tree.children(tree.root).collect();
        assert_eq!(children, vec![a, b, c]);
        assert_eq!(tree.parent(b), Some(tree.root));
        assert_eq!(tree.parent(tree.root), None);
        assert_eq!(*tree.label(c), "c");
    }

    #[test]
    fn test_subtree_size() {
        let mut tree = Tree::new("root");
        let a = tree.add_child(tree.root, "a");
        tree.add_child(a, "a1");
        let b = tree.add_child(tree.root, "b");

        assert_eq!(tree.subtree_size(tree.root), 4);
        assert_eq!(tree.subtree_size(a), 2);
        assert_eq!(tree.subtree_size(b), 1);
        assert_eq!(tree.node_count(), 4);
    }
}
