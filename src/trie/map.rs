//! The map type and its structural mutations.

use core::cell::Cell;
use core::fmt;

use super::cursor::Cursor;
use super::graph::{self, Graph, NodeRef};
use super::node::{Edge, Node, NodeArena, NodeId, ROOT};
use super::order::{CharOrder, CodePointOrder};
use super::path::{common_prefix_len, find_edge_prefix_of, find_sibling_by_first_char, locate_exact};
use crate::error::TrieError;
use crate::log::{debug, trace};

/// An ordered map from string keys to values, stored as a compact trie.
///
/// Keys are ordered character by character under `O` (code point order by
/// default), with every key sorting before its extensions. Besides the usual
/// map operations the trie answers prefix queries: which stored keys are
/// prefixes of a string, and which stored keys start with a string.
///
/// Nodes live in an arena owned by the map; edges refer to them by index.
/// A node with no value always has at least two children (the root
/// excepted), so chains of single-child nodes are merged into one labeled
/// edge.
///
/// ```rust
/// use trie_mapping::TrieMap;
///
/// let mut map = TrieMap::new();
/// map.insert("hello", 3);
/// map.insert("he", 1);
/// map.insert("hey", 5);
///
/// assert_eq!(map.get("he"), Some(&1));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["he", "hello", "hey"]);
/// assert_eq!(map.prefixes_of("hello").len(), 2);
/// ```
#[derive(Clone)]
pub struct TrieMap<V, O = CodePointOrder> {
    /// Arena of nodes. The root is always at index 0.
    pub(crate) nodes: NodeArena<V>,
    /// Number of stored values, `None` until counted after adopting a graph.
    size: Cell<Option<usize>>,
    /// Character order used for every ordered output.
    pub(crate) order: O,
}

impl<V> TrieMap<V, CodePointOrder> {
    /// Creates a new empty map ordered by code point.
    pub fn new() -> Self {
        Self::with_order(CodePointOrder)
    }

    /// Creates a new empty map with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, CodePointOrder)
    }

    /// Adopts an externally built graph as the map's contents.
    ///
    /// The number of entries is not counted up front; it is computed on the
    /// first call to [`len`](Self::len) and remembered from then on.
    ///
    /// # Errors
    /// Returns [`TrieError`] if an edge label is empty or two labels of one
    /// node start with the same character.
    pub fn from_graph(graph: Graph<V>) -> Result<Self, TrieError> {
        Self::from_graph_with_order(graph, CodePointOrder)
    }
}

impl<V, O: CharOrder> TrieMap<V, O> {
    /// Creates a new empty map ordered by `order`.
    pub fn with_order(order: O) -> Self {
        Self::with_capacity_and_order(0, order)
    }

    /// Creates a new empty map ordered by `order` with room for `capacity`
    /// nodes.
    pub fn with_capacity_and_order(capacity: usize, order: O) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            size: Cell::new(Some(0)),
            order,
        }
    }

    /// Adopts `graph` like [`from_graph`](TrieMap::from_graph), ordering
    /// keys by `order`.
    ///
    /// # Errors
    /// Returns [`TrieError`] if the graph's labels are invalid.
    pub fn from_graph_with_order(graph: Graph<V>, order: O) -> Result<Self, TrieError> {
        let nodes = graph::adopt(graph)?;
        debug!(nodes = nodes.live(), "adopted trie graph");
        Ok(Self::from_arena(nodes, order))
    }

    /// Wraps an arena that already satisfies the trie invariants. The size
    /// is counted on first use.
    pub(crate) fn from_arena(nodes: NodeArena<V>, order: O) -> Self {
        Self {
            nodes,
            size: Cell::new(None),
            order,
        }
    }

    /// Returns the character order of the map.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        if let Some(size) = self.size.get() {
            return size;
        }
        let size = graph::count_values(&self.nodes, ROOT);
        debug!(size, "counted entries of adopted trie");
        self.size.set(Some(size));
        size
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        let root = self.nodes.get(ROOT);
        !root.has_value() && root.children.is_empty()
    }

    /// Returns a read-only view of the root node.
    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef::new(&self.nodes, ROOT)
    }

    /// Copies the whole trie into an owned graph.
    pub fn to_graph(&self) -> Graph<V>
    where
        V: Clone,
    {
        graph::export(&self.nodes, ROOT)
    }

    /// Consumes the map and returns its contents as an owned graph.
    pub fn into_graph(mut self) -> Graph<V> {
        graph::export_owned(&mut self.nodes, ROOT)
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&V> {
        let node = locate_exact(&self.nodes, ROOT, key.as_ref())?;
        self.nodes.get(node).value.as_ref()
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut V> {
        let node = locate_exact(&self.nodes, ROOT, key.as_ref())?;
        self.nodes.get_mut(node).value.as_mut()
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key` and returns the value it replaced.
    pub fn insert(&mut self, key: impl AsRef<str>, value: V) -> Option<V> {
        let key = key.as_ref();
        let mut node = ROOT;
        let mut rest = key;

        while !rest.is_empty() {
            if let Some(pos) = find_edge_prefix_of(&self.nodes, node, rest) {
                let edge = &self.nodes.get(node).children[pos];
                rest = &rest[edge.label.len()..];
                node = edge.child;
                continue;
            }

            match find_sibling_by_first_char(&self.nodes, node, rest) {
                Some(pos) => self.split_edge(node, pos, rest, value),
                None => {
                    let leaf = self.nodes.alloc(Node::with_value(value));
                    self.nodes.get_mut(node).children.push(Edge {
                        label: rest.into(),
                        child: leaf,
                    });
                    trace!(key, label = rest, "attached leaf");
                }
            }
            self.grow();
            return None;
        }

        let old = self.nodes.get_mut(node).value.replace(value);
        if old.is_none() {
            self.grow();
        }
        old
    }

    /// Splits the edge at `parent.children[pos]` where it stops agreeing
    /// with `rest`, and hangs `value` at the new key.
    fn split_edge(&mut self, parent: NodeId, pos: usize, rest: &str, value: V) {
        let (old_label, old_child) = {
            let edge = &self.nodes.get(parent).children[pos];
            (edge.label.clone(), edge.child)
        };
        let common = common_prefix_len(&old_label, rest);
        debug_assert!(common > 0 && common < old_label.len());

        let mut mid = Node::new();
        mid.children.push(Edge {
            label: old_label[common..].into(),
            child: old_child,
        });
        if common == rest.len() {
            mid.value = Some(value);
        } else {
            let leaf = self.nodes.alloc(Node::with_value(value));
            mid.children.push(Edge {
                label: rest[common..].into(),
                child: leaf,
            });
        }
        let mid = self.nodes.alloc(mid);

        let edge = &mut self.nodes.get_mut(parent).children[pos];
        edge.label = old_label[..common].into();
        edge.child = mid;
        trace!(label = &*old_label, at = common, "split edge");
    }

    /// Removes the value stored under `key` and returns it.
    ///
    /// Nodes left without a value are merged or unlinked so the trie stays
    /// compact; only the removed node's parent and grandparent are touched.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<V> {
        let key = key.as_ref();
        // (node, edge position) for every edge followed from the root.
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut node = ROOT;
        let mut rest = key;
        while !rest.is_empty() {
            let pos = find_edge_prefix_of(&self.nodes, node, rest)?;
            path.push((node, pos));
            let edge = &self.nodes.get(node).children[pos];
            rest = &rest[edge.label.len()..];
            node = edge.child;
        }

        let old = self.nodes.get_mut(node).value.take()?;
        self.shrink();

        if let Some(&(parent, pos)) = path.last() {
            match self.nodes.get(node).children.len() {
                0 => {
                    self.nodes.get_mut(parent).children.remove(pos);
                    self.nodes.free(node);
                    trace!(key, "unlinked leaf");
                    if let [.., (grandparent, parent_pos), _] = path[..] {
                        if self.nodes.get(parent).is_pass_through() {
                            self.merge_child(grandparent, parent_pos);
                        }
                    }
                }
                1 => self.merge_child(parent, pos),
                _ => {}
            }
        }
        Some(old)
    }

    /// Removes the value stored under `key`, returning whether there was one.
    pub fn delete(&mut self, key: impl AsRef<str>) -> bool {
        self.remove(key).is_some()
    }

    /// Replaces the edge `parent.children[pos]`, whose target is a
    /// pass-through node, by a single edge to that node's only child.
    fn merge_child(&mut self, parent: NodeId, pos: usize) {
        let mid = self.nodes.get(parent).children[pos].child;
        let Some(tail) = self.nodes.get_mut(mid).children.pop() else {
            return;
        };
        self.nodes.free(mid);
        let edge = &mut self.nodes.get_mut(parent).children[pos];
        let mut label = String::with_capacity(edge.label.len() + tail.label.len());
        label.push_str(&edge.label);
        label.push_str(&tail.label);
        trace!(label = label.as_str(), "merged edge");
        edge.label = label.into_boxed_str();
        edge.child = tail.child;
    }

    /// Removes every entry.
    ///
    /// The root stays in place and is emptied, so cursors created before the
    /// call see an empty map and resume against whatever is inserted next.
    pub fn clear(&mut self) {
        self.nodes.reset();
        self.size.set(Some(0));
        trace!("cleared trie");
    }

    /// Calls `f` with the map and each key in order, allowing `f` to insert
    /// and remove entries as it goes.
    ///
    /// Keys inserted ahead of the current one are visited, keys removed
    /// before they are reached are not, and no key is visited twice.
    ///
    /// ```rust
    /// use trie_mapping::TrieMap;
    ///
    /// let mut map: TrieMap<u32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let mut seen = Vec::new();
    /// map.for_each_mut(|map, key| {
    ///     seen.push(key.to_owned());
    ///     if key == "a" {
    ///         map.insert("ab", 0);
    ///     }
    /// });
    /// assert_eq!(seen, ["a", "ab", "b"]);
    /// ```
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, &str),
    {
        let mut cursor = Cursor::new();
        while let Some(key) = cursor.advance(self).map(|(key, _)| key) {
            f(self, &key);
        }
    }

    #[inline]
    fn grow(&self) {
        if let Some(size) = self.size.get() {
            self.size.set(Some(size + 1));
        }
    }

    #[inline]
    fn shrink(&self) {
        if let Some(size) = self.size.get() {
            self.size.set(Some(size - 1));
        }
    }
}

impl<V, O: CharOrder + Default> Default for TrieMap<V, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<V: fmt::Debug, O: CharOrder> fmt::Debug for TrieMap<V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq, O: CharOrder> PartialEq for TrieMap<V, O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq, O: CharOrder> Eq for TrieMap<V, O> {}
