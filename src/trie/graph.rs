//! Owned node graphs and read-only node views.
//!
//! [`Graph`] is the interop shape of a trie: a plain nested structure that can
//! be built by hand, (de)serialized with `serde`, exported from a map with
//! [`TrieMap::to_graph`](super::TrieMap::to_graph) and adopted back with
//! [`TrieMap::from_graph`](super::TrieMap::from_graph).
//!
//! Adoption validates the labels and normalizes the shape: empty subtrees
//! are dropped and valueless single-child nodes are merged into their child,
//! so every adopted map satisfies the same invariants as one built by
//! insertion.

use core::mem;
use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use super::node::{Edge, Node, NodeArena, NodeId, ROOT};
use super::path::labels_clash;
use crate::error::TrieError;

/// An owned trie node together with everything below it.
///
/// `value` marks that the labels from the root down to this node spell a
/// stored key. `children` maps edge labels to subgraphs.
///
/// ```rust
/// use trie_mapping::{Graph, TrieMap};
///
/// let graph = Graph::new().with_child(
///     "h",
///     Graph::new()
///         .with_child("ey", Graph::leaf(0))
///         .with_child("i", Graph::leaf(1)),
/// );
/// let map = TrieMap::from_graph(graph).unwrap();
/// assert_eq!(map.get("hey"), Some(&0));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph<V> {
    /// Value stored at this node, if a key ends here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
    /// Subgraphs keyed by their edge label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Graph<V>>,
}

impl<V> Graph<V> {
    /// Creates a graph with no value and no children.
    pub fn new() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }

    /// Creates a childless graph holding `value`.
    pub fn leaf(value: V) -> Self {
        Self {
            value: Some(value),
            children: BTreeMap::new(),
        }
    }

    /// Sets the value of this node.
    #[must_use]
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds (or replaces) the subgraph under `label`.
    #[must_use]
    pub fn with_child(mut self, label: impl Into<String>, child: Graph<V>) -> Self {
        self.children.insert(label.into(), child);
        self
    }

    /// Returns `true` if the node has neither a value nor children.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Detaches the children level by level so deep graphs drop without
/// recursing.
impl<V> Drop for Graph<V> {
    fn drop(&mut self) {
        let mut stack: Vec<Graph<V>> = mem::take(&mut self.children).into_values().collect();
        while let Some(mut graph) = stack.pop() {
            stack.extend(mem::take(&mut graph.children).into_values());
        }
    }
}

/// A read-only view of one node of a [`TrieMap`](super::TrieMap).
///
/// Obtained from [`TrieMap::root`](super::TrieMap::root) or the branch
/// queries. Borrowing the map keeps the view valid.
pub struct NodeRef<'a, V> {
    nodes: &'a NodeArena<V>,
    id: NodeId,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V> core::fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("has_value", &self.has_value())
            .field("labels", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(nodes: &'a NodeArena<V>, id: NodeId) -> Self {
        Self { nodes, id }
    }

    fn node(&self) -> &'a Node<V> {
        self.nodes.get(self.id)
    }

    /// Returns `true` if a key ends at this node.
    pub fn has_value(&self) -> bool {
        self.node().has_value()
    }

    /// The value stored at this node.
    pub fn value(&self) -> Option<&'a V> {
        self.node().value.as_ref()
    }

    /// The child reached through exactly `label`.
    pub fn child(&self, label: &str) -> Option<NodeRef<'a, V>> {
        self.node()
            .child_labeled(label)
            .map(|id| NodeRef::new(self.nodes, id))
    }

    /// Edge labels of this node, in no particular order.
    pub fn labels(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.node().labels()
    }

    /// Outgoing edges with their target nodes, in no particular order.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a, V>)> + 'a {
        let nodes = self.nodes;
        self.node()
            .children
            .iter()
            .map(move |edge| (&*edge.label, NodeRef::new(nodes, edge.child)))
    }

    /// Number of values stored at or below this node.
    pub fn len(&self) -> usize {
        count_values(self.nodes, self.id)
    }

    /// Returns `true` if no value is stored at or below this node.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies this node and everything below it into an owned graph.
    pub fn to_graph(&self) -> Graph<V>
    where
        V: Clone,
    {
        export(self.nodes, self.id)
    }
}

/// Counts occupied value slots at or below `id`.
pub(crate) fn count_values<V>(nodes: &NodeArena<V>, id: NodeId) -> usize {
    let mut stack = vec![id];
    let mut count = 0;
    while let Some(idx) = stack.pop() {
        let node = nodes.get(idx);
        if node.has_value() {
            count += 1;
        }
        stack.extend(node.children.iter().map(|edge| edge.child));
    }
    count
}

/// A graph node being adopted: its children are consumed one at a time and
/// the edges built for them collected until the node can be closed.
struct AdoptFrame<V> {
    /// Label of the edge leading here, empty for the root.
    label: String,
    /// Length of the path before `label` was appended.
    mark: usize,
    value: Option<V>,
    pending: btree_map::IntoIter<String, Graph<V>>,
    edges: Vec<Edge>,
}

impl<V> AdoptFrame<V> {
    /// Appends `label` to `path` and validates the labels below `graph`.
    fn open(path: &mut String, label: String, mut graph: Graph<V>) -> Result<Self, TrieError> {
        let mark = path.len();
        path.push_str(&label);
        let children = mem::take(&mut graph.children);
        check_labels(path, children.keys())?;
        Ok(Self {
            label,
            mark,
            value: graph.value.take(),
            edges: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        })
    }
}

/// Builds an arena from `graph`, validating and normalizing as it goes.
///
/// The walk keeps its own stack, so arbitrarily deep graphs are adopted
/// without recursion and every consumed graph node is dropped childless.
pub(crate) fn adopt<V>(graph: Graph<V>) -> Result<NodeArena<V>, TrieError> {
    let mut nodes = NodeArena::with_capacity(0);
    let mut path = String::new();
    let mut stack = vec![AdoptFrame::open(&mut path, String::new(), graph)?];

    while let Some(mut frame) = stack.pop() {
        if let Some((label, child)) = frame.pending.next() {
            let child = AdoptFrame::open(&mut path, label, child)?;
            stack.push(frame);
            stack.push(child);
            continue;
        }

        path.truncate(frame.mark);
        let AdoptFrame {
            mut label,
            value,
            edges,
            ..
        } = frame;
        let Some(parent) = stack.last_mut() else {
            let root = nodes.get_mut(ROOT);
            root.value = value;
            root.children = edges;
            break;
        };
        if let Some((extension, child)) = close_node(&mut nodes, value, edges) {
            label.push_str(&extension);
            parent.edges.push(Edge {
                label: label.into_boxed_str(),
                child,
            });
        }
    }
    Ok(nodes)
}

/// Returns the node built from `value` and `edges` plus the label extension
/// left over from merging a pass-through node, or `None` for an empty
/// subtree.
fn close_node<V>(
    nodes: &mut NodeArena<V>,
    value: Option<V>,
    mut edges: Vec<Edge>,
) -> Option<(String, NodeId)> {
    if value.is_none() && edges.len() <= 1 {
        return edges
            .pop()
            .map(|edge| (String::from(edge.label), edge.child));
    }
    let id = nodes.alloc(Node {
        value,
        children: edges,
    });
    Some((String::new(), id))
}

/// Labels arrive in byte order, so labels sharing a first character are
/// adjacent.
fn check_labels<'l>(
    path: &str,
    labels: impl Iterator<Item = &'l String>,
) -> Result<(), TrieError> {
    let mut previous: Option<&String> = None;
    for label in labels {
        if label.is_empty() {
            return Err(TrieError::EmptyLabel { path: path.into() });
        }
        if let Some(prev) = previous {
            if labels_clash(prev, label) {
                return Err(TrieError::SharedFirstChar {
                    path: path.into(),
                    first: prev.clone(),
                    second: label.clone(),
                });
            }
        }
        previous = Some(label);
    }
    Ok(())
}

/// An arena node being exported, with the edges still to visit.
struct ExportFrame<V> {
    label: String,
    graph: Graph<V>,
    pending: std::vec::IntoIter<(String, NodeId)>,
}

impl<V> ExportFrame<V> {
    fn open<F>(label: String, id: NodeId, visit: &mut F) -> Self
    where
        F: FnMut(NodeId) -> (Option<V>, Vec<(String, NodeId)>),
    {
        let (value, edges) = visit(id);
        Self {
            label,
            graph: Graph {
                value,
                children: BTreeMap::new(),
            },
            pending: edges.into_iter(),
        }
    }
}

/// Assembles the graph below `id` bottom-up with an explicit stack.
/// `visit` yields a node's value and outgoing edges.
fn build_graph<V, F>(id: NodeId, mut visit: F) -> Graph<V>
where
    F: FnMut(NodeId) -> (Option<V>, Vec<(String, NodeId)>),
{
    let mut stack = vec![ExportFrame::open(String::new(), id, &mut visit)];
    while let Some(mut frame) = stack.pop() {
        if let Some((label, child)) = frame.pending.next() {
            let child = ExportFrame::open(label, child, &mut visit);
            stack.push(frame);
            stack.push(child);
            continue;
        }
        match stack.last_mut() {
            Some(parent) => {
                parent.graph.children.insert(frame.label, frame.graph);
            }
            None => return frame.graph,
        }
    }
    // The root frame is always closed last and returned above.
    Graph::new()
}

/// Copies the subtree at `id` into an owned graph.
pub(crate) fn export<V: Clone>(nodes: &NodeArena<V>, id: NodeId) -> Graph<V> {
    build_graph(id, |id| {
        let node = nodes.get(id);
        let edges = node
            .children
            .iter()
            .map(|edge| (edge.label.to_string(), edge.child))
            .collect();
        (node.value.clone(), edges)
    })
}

/// Moves the subtree at `id` out of the arena.
pub(crate) fn export_owned<V>(nodes: &mut NodeArena<V>, id: NodeId) -> Graph<V> {
    build_graph(id, |id| {
        let node = nodes.get_mut(id);
        let edges = mem::take(&mut node.children)
            .into_iter()
            .map(|edge| (String::from(edge.label), edge.child))
            .collect();
        (node.value.take(), edges)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adopt_keeps_compact_graph() {
        let graph = Graph::new().with_child(
            "h",
            Graph::new()
                .with_child("ey", Graph::leaf(0))
                .with_child("i", Graph::leaf(1)),
        );
        let nodes = adopt(graph.clone()).unwrap();
        assert_eq!(export(&nodes, ROOT), graph);
        assert_eq!(count_values(&nodes, ROOT), 2);
    }

    #[test]
    fn test_adopt_merges_pass_through_nodes() {
        let graph = Graph::new().with_child(
            "h",
            Graph::new().with_child("e", Graph::new().with_child("y", Graph::leaf(3))),
        );
        let nodes = adopt(graph).unwrap();
        assert_eq!(
            export(&nodes, ROOT),
            Graph::new().with_child("hey", Graph::leaf(3))
        );
    }

    #[test]
    fn test_adopt_drops_empty_subtrees() {
        let graph = Graph::new()
            .with_child("a", Graph::new())
            .with_child("b", Graph::new().with_child("c", Graph::new()))
            .with_child("d", Graph::leaf(1));
        let nodes = adopt(graph).unwrap();
        assert_eq!(export(&nodes, ROOT), Graph::new().with_child("d", Graph::leaf(1)));
        assert_eq!(nodes.live(), 2);
    }

    #[test]
    fn test_adopt_rejects_empty_label() {
        let graph = Graph::new().with_child("he", Graph::new().with_child("", Graph::leaf(1)));
        assert_eq!(
            adopt(graph).unwrap_err(),
            TrieError::EmptyLabel { path: "he".into() }
        );
    }

    #[test]
    fn test_adopt_rejects_shared_first_char() {
        let graph: Graph<u8> = Graph::new()
            .with_child("hey", Graph::leaf(0))
            .with_child("hi", Graph::leaf(1));
        assert_eq!(
            adopt(graph).unwrap_err(),
            TrieError::SharedFirstChar {
                path: String::new(),
                first: "hey".into(),
                second: "hi".into(),
            }
        );
    }

    #[test]
    fn test_export_owned_moves_values() {
        let graph = Graph::leaf(String::from("root")).with_child("x", Graph::leaf(String::from("x")));
        let mut nodes = adopt(graph.clone()).unwrap();
        assert_eq!(export_owned(&mut nodes, ROOT), graph);
        assert!(!nodes.get(ROOT).has_value());
    }

    #[test]
    fn test_node_ref_navigation() {
        let nodes = adopt(
            Graph::new().with_child(
                "he",
                Graph::leaf(1)
                    .with_child("y", Graph::leaf(5))
                    .with_child("ll", Graph::leaf(2).with_child("o", Graph::leaf(3))),
            ),
        )
        .unwrap();
        let root = NodeRef::new(&nodes, ROOT);
        assert!(!root.has_value());
        assert_eq!(root.len(), 4);

        let he = root.child("he").unwrap();
        assert_eq!(he.value(), Some(&1));
        let mut labels: Vec<_> = he.labels().collect();
        labels.sort_unstable();
        assert_eq!(labels, ["ll", "y"]);
        assert!(he.child("l").is_none());
        assert_eq!(he.child("ll").unwrap().len(), 2);
        assert_eq!(he.children().count(), 2);
    }
}
