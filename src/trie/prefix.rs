//! Prefix queries.
//!
//! Two directions are supported: stored keys that are prefixes of a given
//! string ([`TrieMap::prefixes_of`] and the first/last branch variants), and
//! stored keys that start with a given string ([`TrieMap::prefixed_with`]).

use super::cursor::Cursor;
use super::graph::NodeRef;
use super::iter::Iter;
use super::map::TrieMap;
use super::node::{NodeArena, NodeId, ROOT};
use super::order::CharOrder;
use super::path::{find_edge_prefix_of, find_sibling_by_first_char};
use crate::log::debug;

/// Finds the deepest node whose path starts with `prefix`.
///
/// Unlike an exact lookup the walk may end inside an edge label; the
/// returned string is then the full path to the node below that edge, which
/// is longer than `prefix`.
pub(crate) fn locate_branch<V>(nodes: &NodeArena<V>, prefix: &str) -> Option<(String, NodeId)> {
    let mut branch = String::with_capacity(prefix.len());
    let mut node = ROOT;
    let mut rest = prefix;
    while !rest.is_empty() {
        if let Some(pos) = find_edge_prefix_of(nodes, node, rest) {
            let edge = &nodes.get(node).children[pos];
            branch.push_str(&edge.label);
            rest = &rest[edge.label.len()..];
            node = edge.child;
            continue;
        }
        let pos = find_sibling_by_first_char(nodes, node, rest)?;
        let edge = &nodes.get(node).children[pos];
        if !edge.label.starts_with(rest) {
            return None;
        }
        branch.push_str(&edge.label);
        return Some((branch, edge.child));
    }
    Some((branch, node))
}

/// Value-bearing nodes whose path is a prefix of a string, shortest first.
struct PrefixWalk<'a, 'k, V> {
    nodes: &'a NodeArena<V>,
    string: &'k str,
    /// Bytes of `string` consumed to reach `node`; `None` once the walk
    /// has left the trie.
    consumed: Option<usize>,
    node: NodeId,
}

impl<'a, 'k, V> PrefixWalk<'a, 'k, V> {
    fn new(nodes: &'a NodeArena<V>, string: &'k str) -> Self {
        Self {
            nodes,
            string,
            consumed: Some(0),
            node: ROOT,
        }
    }
}

impl<'a, 'k, V> Iterator for PrefixWalk<'a, 'k, V> {
    type Item = (&'k str, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let consumed = self.consumed?;
            let node = self.node;
            let rest = &self.string[consumed..];

            match find_edge_prefix_of(self.nodes, node, rest) {
                Some(pos) => {
                    let edge = &self.nodes.get(node).children[pos];
                    self.node = edge.child;
                    self.consumed = Some(consumed + edge.label.len());
                }
                None => self.consumed = None,
            }

            if self.nodes.get(node).has_value() {
                return Some((&self.string[..consumed], node));
            }
        }
    }
}

impl<V, O: CharOrder> TrieMap<V, O> {
    /// Returns every stored key that is a prefix of `string`, with its
    /// value, shortest first.
    ///
    /// ```rust
    /// use trie_mapping::TrieMap;
    ///
    /// let map: TrieMap<u32> = [("he", 1), ("hell", 2), ("hello", 3), ("hey", 5)]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(
    ///     map.prefixes_of("hello world"),
    ///     [("he", &1), ("hell", &2), ("hello", &3)]
    /// );
    /// ```
    pub fn prefixes_of<'k>(&self, string: &'k str) -> Vec<(&'k str, &V)> {
        PrefixWalk::new(&self.nodes, string)
            .filter_map(|(prefix, node)| self.nodes.get(node).value.as_ref().map(|v| (prefix, v)))
            .collect()
    }

    /// Returns the shortest stored key that is a prefix of `string`,
    /// together with its node.
    pub fn branch_of_first_prefix<'k>(&self, string: &'k str) -> Option<(&'k str, NodeRef<'_, V>)> {
        PrefixWalk::new(&self.nodes, string)
            .next()
            .map(|(prefix, node)| (prefix, NodeRef::new(&self.nodes, node)))
    }

    /// Returns the longest stored key that is a prefix of `string`,
    /// together with its node.
    pub fn branch_of_last_prefix<'k>(&self, string: &'k str) -> Option<(&'k str, NodeRef<'_, V>)> {
        PrefixWalk::new(&self.nodes, string)
            .last()
            .map(|(prefix, node)| (prefix, NodeRef::new(&self.nodes, node)))
    }

    /// Locates the branch holding every key that starts with `prefix`.
    ///
    /// The returned string is the path to the branch node, which may extend
    /// past `prefix` when `prefix` ends inside an edge. Keys below the node
    /// are relative to that string.
    pub fn branch_prefixed_with(&self, prefix: &str) -> Option<(String, NodeRef<'_, V>)> {
        locate_branch(&self.nodes, prefix).map(|(branch, node)| (branch, NodeRef::new(&self.nodes, node)))
    }

    /// Returns an iterator over the entries whose key starts with `prefix`,
    /// in key order.
    pub fn prefixed_with(&self, prefix: &str) -> Iter<'_, V, O> {
        let cursor = match locate_branch(&self.nodes, prefix) {
            Some((branch, _)) => Cursor::with_prefix(branch),
            None => Cursor::exhausted(),
        };
        Iter::new(self, cursor)
    }

    /// Returns the smallest entry whose key starts with `prefix`.
    pub fn first_prefixed_with(&self, prefix: &str) -> Option<(String, &V)> {
        self.prefixed_with(prefix).next()
    }

    /// Copies the branch holding the keys that start with `prefix` into a
    /// map of its own.
    ///
    /// Returns the branch path and the new map, whose keys are relative to
    /// that path.
    ///
    /// ```rust
    /// use trie_mapping::TrieMap;
    ///
    /// let map: TrieMap<u32> = [("prefix", 1), ("prepare", 2), ("other", 3)]
    ///     .into_iter()
    ///     .collect();
    /// let (branch, sub) = map.subtrie("pr").unwrap();
    /// assert_eq!(branch, "pre");
    /// assert_eq!(sub.keys().collect::<Vec<_>>(), ["fix", "pare"]);
    /// ```
    pub fn subtrie(&self, prefix: &str) -> Option<(String, TrieMap<V, O>)>
    where
        V: Clone,
        O: Clone,
    {
        let (branch, node) = locate_branch(&self.nodes, prefix)?;
        let nodes = self.nodes.copy_subtree(node);
        debug!(branch = branch.as_str(), nodes = nodes.live(), "copied subtrie");
        Some((branch, TrieMap::from_arena(nodes, self.order.clone())))
    }
}
