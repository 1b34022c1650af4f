//! Lookup primitives shared by mutation, traversal and prefix queries.
//!
//! All of them rely on the disjointness invariant: at most one edge of a node
//! starts with any given character. The edge that could continue a string is
//! therefore found by its first character alone, and "the longest label that
//! prefixes the string" is that edge whenever it matches at all.

use super::node::{NodeArena, NodeId};
use super::order::first_char;

/// Returns the edge position of `node` whose label is a non-empty prefix of
/// `s`. The empty string never matches.
pub(crate) fn find_edge_prefix_of<V>(arena: &NodeArena<V>, node: NodeId, s: &str) -> Option<usize> {
    let pos = find_sibling_by_first_char(arena, node, s)?;
    let label = &arena.get(node).children[pos].label;
    s.starts_with(&**label).then_some(pos)
}

/// Returns the edge position of `node` whose label shares `s`'s first
/// character.
pub(crate) fn find_sibling_by_first_char<V>(
    arena: &NodeArena<V>,
    node: NodeId,
    s: &str,
) -> Option<usize> {
    let c = s.chars().next()?;
    arena.get(node).edge_starting_with(c)
}

/// Follows edges from `node` along `key` and returns the node the whole key
/// leads to, value-bearing or not.
pub(crate) fn locate_exact<V>(arena: &NodeArena<V>, mut node: NodeId, key: &str) -> Option<NodeId> {
    let mut rest = key;
    while !rest.is_empty() {
        let pos = find_edge_prefix_of(arena, node, rest)?;
        let edge = &arena.get(node).children[pos];
        rest = &rest[edge.label.len()..];
        node = edge.child;
    }
    Some(node)
}

/// Length in bytes of the longest common prefix of `a` and `b`, always on a
/// character boundary of both.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((idx, _), _)| idx)
}

/// Whether two labels could sit under the same node.
#[inline]
pub(crate) fn labels_clash(a: &str, b: &str) -> bool {
    first_char(a) == first_char(b)
}
