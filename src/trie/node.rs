//! Arena storage for trie nodes.

use super::order::first_char;

/// Index of a node in the arena.
pub(crate) type NodeId = usize;

/// The root always lives in the first slot and is never freed.
pub(crate) const ROOT: NodeId = 0;

/// A slot in the trie arena.
/// Can be either an occupied node or a link to the next free slot.
#[derive(Debug, Clone)]
pub(crate) enum NodeSlot<V> {
    Occupied(Node<V>),
    Free(Option<NodeId>),
}

/// A labeled link from a parent to a child node.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    /// Non-empty substring of the keys below `child`.
    pub(crate) label: Box<str>,
    pub(crate) child: NodeId,
}

/// A node in the compact trie.
///
/// Each node contains:
/// - An optional value (if the labels from the root to this node spell a key).
/// - A list of outgoing edges, in insertion order. No two labels of the same
///   node start with the same character.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) value: Option<V>,
    pub(crate) children: Vec<Edge>,
}

impl<V> Node<V> {
    /// Creates a new empty node.
    pub(crate) fn new() -> Self {
        Self {
            value: None,
            children: Vec::new(),
        }
    }

    /// Creates a new leaf holding `value`.
    pub(crate) fn with_value(value: V) -> Self {
        Self {
            value: Some(value),
            children: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Finds the child reached through exactly `label`.
    pub(crate) fn child_labeled(&self, label: &str) -> Option<NodeId> {
        self.children
            .iter()
            .find(|edge| &*edge.label == label)
            .map(|edge| edge.child)
    }

    /// Labels of the outgoing edges, in no particular order.
    pub(crate) fn labels(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|edge| &*edge.label)
    }

    /// Position of the edge whose label starts with `c`.
    pub(crate) fn edge_starting_with(&self, c: char) -> Option<usize> {
        self.children
            .iter()
            .position(|edge| first_char(&edge.label) == c)
    }

    /// A node the compaction invariant would merge away: no value and a
    /// single child.
    #[inline]
    pub(crate) fn is_pass_through(&self) -> bool {
        self.value.is_none() && self.children.len() == 1
    }
}

/// Node storage with slot reuse.
///
/// Freed slots are threaded into a singly linked free list and handed out
/// again by [`NodeArena::alloc`] before the vector grows.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<V> {
    slots: Vec<NodeSlot<V>>,
    free_head: Option<NodeId>,
    live: usize,
}

impl<V> NodeArena<V> {
    /// Creates an arena holding only an empty root.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.push(NodeSlot::Occupied(Node::new()));
        Self {
            slots,
            free_head: None,
            live: 1,
        }
    }

    /// Stores `node` and returns its index.
    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        self.live += 1;
        match self.free_head {
            Some(idx) => {
                if let NodeSlot::Free(next) = self.slots[idx] {
                    self.free_head = next;
                }
                self.slots[idx] = NodeSlot::Occupied(node);
                idx
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(NodeSlot::Occupied(node));
                idx
            }
        }
    }

    /// Releases the slot at `idx` and returns the node it held.
    pub(crate) fn free(&mut self, idx: NodeId) -> Node<V> {
        debug_assert_ne!(idx, ROOT, "the root is never freed");
        let slot = core::mem::replace(&mut self.slots[idx], NodeSlot::Free(self.free_head));
        self.free_head = Some(idx);
        self.live -= 1;
        match slot {
            NodeSlot::Occupied(node) => node,
            NodeSlot::Free(_) => unreachable!("double free of trie node {idx}"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, idx: NodeId) -> &Node<V> {
        match &self.slots[idx] {
            NodeSlot::Occupied(node) => node,
            NodeSlot::Free(_) => unreachable!("trie edge points at free slot {idx}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: NodeId) -> &mut Node<V> {
        match &mut self.slots[idx] {
            NodeSlot::Occupied(node) => node,
            NodeSlot::Free(_) => unreachable!("trie edge points at free slot {idx}"),
        }
    }

    /// Drops every node and leaves an empty root in place.
    pub(crate) fn reset(&mut self) {
        self.slots.truncate(1);
        let root = self.get_mut(ROOT);
        root.value = None;
        root.children.clear();
        self.free_head = None;
        self.live = 1;
    }

    /// Number of occupied slots, root included.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn live(&self) -> usize {
        self.live
    }
}

impl<V: Clone> NodeArena<V> {
    /// Copies the subtree at `id` into a new arena whose root mirrors `id`.
    pub(crate) fn copy_subtree(&self, id: NodeId) -> Self {
        let mut copy = Self::with_capacity(0);
        copy.get_mut(ROOT).value.clone_from(&self.get(id).value);

        let mut stack = vec![(id, ROOT)];
        while let Some((src, dst)) = stack.pop() {
            for edge in &self.get(src).children {
                let child = copy.alloc(Node {
                    value: self.get(edge.child).value.clone(),
                    children: Vec::with_capacity(self.get(edge.child).children.len()),
                });
                copy.get_mut(dst).children.push(Edge {
                    label: edge.label.clone(),
                    child,
                });
                stack.push((edge.child, child));
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_reuses_freed_slots() {
        let mut arena: NodeArena<u32> = NodeArena::with_capacity(4);
        let a = arena.alloc(Node::with_value(1));
        let b = arena.alloc(Node::with_value(2));
        assert_eq!(arena.live(), 3);

        assert_eq!(arena.free(a).value, Some(1));
        let c = arena.alloc(Node::with_value(3));
        assert_eq!(c, a);
        assert_eq!(arena.get(b).value, Some(2));
        assert_eq!(arena.get(c).value, Some(3));
        assert_eq!(arena.live(), 3);
    }

    #[test]
    fn test_reset_keeps_root() {
        let mut arena: NodeArena<u32> = NodeArena::with_capacity(0);
        let leaf = arena.alloc(Node::with_value(7));
        arena.get_mut(ROOT).children.push(Edge {
            label: "hi".into(),
            child: leaf,
        });
        arena.get_mut(ROOT).value = Some(1);

        arena.reset();
        assert_eq!(arena.live(), 1);
        assert!(!arena.get(ROOT).has_value());
        assert_eq!(arena.get(ROOT).labels().count(), 0);
    }

    #[test]
    fn test_node_lookups() {
        let mut node: Node<()> = Node::new();
        node.children.push(Edge {
            label: "ey".into(),
            child: 1,
        });
        node.children.push(Edge {
            label: "i".into(),
            child: 2,
        });

        assert_eq!(node.child_labeled("ey"), Some(1));
        assert_eq!(node.child_labeled("e"), None);
        assert_eq!(node.edge_starting_with('i'), Some(1));
        assert_eq!(node.edge_starting_with('x'), None);
        assert!(!node.is_pass_through());
        assert_eq!(node.labels().collect::<Vec<_>>(), ["ey", "i"]);
    }

    #[test]
    fn test_copy_subtree() {
        let mut arena: NodeArena<u32> = NodeArena::with_capacity(0);
        let o = arena.alloc(Node::with_value(3));
        let s = arena.alloc(Node::with_value(4));
        let mut ll = Node::with_value(2);
        ll.children.push(Edge { label: "o".into(), child: o });
        ll.children.push(Edge { label: "s".into(), child: s });
        let ll = arena.alloc(ll);
        arena.get_mut(ROOT).children.push(Edge { label: "hell".into(), child: ll });

        let copy = arena.copy_subtree(ll);
        assert_eq!(copy.live(), 3);
        let root = copy.get(ROOT);
        assert_eq!(root.value, Some(2));
        assert_eq!(root.labels().collect::<Vec<_>>(), ["o", "s"]);
        let s_copy = root.child_labeled("s").unwrap();
        assert_eq!(copy.get(s_copy).value, Some(4));

        // The source arena is untouched.
        assert_eq!(arena.live(), 4);
        assert_eq!(arena.get(s).value, Some(4));
    }
}
