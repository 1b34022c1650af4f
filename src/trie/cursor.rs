//! Resumable ordered traversal.
//!
//! A [`Cursor`] remembers *where* it is as the key it last yielded, never as
//! a node index. Every [`advance`](Cursor::advance) re-walks the trie from
//! the root along that key, so the map may be mutated freely between two
//! advances: edges that were split or merged in the meantime are simply
//! matched differently on the next walk.

use core::cmp::Ordering;

use super::map::TrieMap;
use super::node::{NodeArena, NodeId, ROOT};
use super::order::{compare_str, first_char, CharOrder};
use super::path::{find_edge_prefix_of, find_sibling_by_first_char};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Active,
    Done,
}

/// A detached, mutation-tolerant position in a [`TrieMap`].
///
/// The cursor does not borrow the map between calls; each
/// [`advance`](Self::advance) takes the map by shared reference. Successive
/// advances yield strictly increasing keys:
///
/// - keys already yielded are never yielded again,
/// - keys inserted after the current position are yielded when reached,
/// - keys removed before being reached are skipped.
///
/// ```rust
/// use trie_mapping::{Cursor, TrieMap};
///
/// let mut map: TrieMap<u32> = [("a", 1), ("c", 3)].into_iter().collect();
/// let mut cursor = Cursor::new();
/// assert_eq!(cursor.advance(&map), Some(("a".to_owned(), &1)));
///
/// map.insert("b", 2);
/// map.remove("c");
/// assert_eq!(cursor.advance(&map), Some(("b".to_owned(), &2)));
/// assert_eq!(cursor.advance(&map), None);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Only keys starting with this string are yielded.
    prefix: String,
    /// Labels of the path to the last yielded node, concatenated.
    last: String,
    phase: Phase,
}

impl Cursor {
    /// Creates a cursor positioned before the first key.
    pub fn new() -> Self {
        Self::with_prefix(String::new())
    }

    /// Creates a cursor over the keys starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last: String::new(),
            phase: Phase::Fresh,
        }
    }

    /// Creates a cursor that yields nothing.
    pub(crate) fn exhausted() -> Self {
        Self {
            prefix: String::new(),
            last: String::new(),
            phase: Phase::Done,
        }
    }

    /// The key yielded by the most recent successful advance.
    pub fn last_key(&self) -> Option<&str> {
        (self.phase == Phase::Active).then_some(self.last.as_str())
    }

    /// Returns `true` once the cursor has run past the last key.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Moves to the next key of `map` and returns it with its value.
    ///
    /// Returns `None` when no key after the current position remains; the
    /// cursor then stays exhausted even if keys are inserted later.
    pub fn advance<'a, V, O: CharOrder>(&mut self, map: &'a TrieMap<V, O>) -> Option<(String, &'a V)> {
        let found = match self.phase {
            Phase::Done => return None,
            Phase::Fresh => seek(&map.nodes, &map.order, &self.prefix, true),
            Phase::Active => seek(&map.nodes, &map.order, &self.last, false),
        };

        let entry = found
            .filter(|(key, _)| key.starts_with(self.prefix.as_str()))
            .and_then(|(key, node)| map.nodes.get(node).value.as_ref().map(|value| (key, value)));

        match entry {
            Some((key, value)) => {
                self.last.clone_from(&key);
                self.phase = Phase::Active;
                Some((key, value))
            }
            None => {
                self.phase = Phase::Done;
                self.last.clear();
                None
            }
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the smallest key after `from` (or at it, when `inclusive`).
///
/// Walks from the root along `from`. While `from` still follows real edges
/// the walk records each level; where it leaves the trie, the rest of
/// `from` is compared against the edge sharing its first character to
/// decide whether that subtree lies ahead. Levels with nothing ahead are
/// popped until a greater label is found or the root is exhausted.
fn seek<V, O: CharOrder>(
    nodes: &NodeArena<V>,
    order: &O,
    from: &str,
    inclusive: bool,
) -> Option<(String, NodeId)> {
    // (node, first char of the label taken out of it, key length before it)
    let mut trail: Vec<(NodeId, char, usize)> = Vec::new();
    let mut key = String::with_capacity(from.len());
    let mut node = ROOT;
    let mut rest = from;

    loop {
        if rest.is_empty() {
            if inclusive && nodes.get(node).has_value() {
                return Some((key, node));
            }
            if let Some(pos) = next_edge(nodes, order, node, None) {
                return Some(descend(nodes, order, key, node, pos));
            }
            break;
        }

        if let Some(pos) = find_edge_prefix_of(nodes, node, rest) {
            let edge = &nodes.get(node).children[pos];
            trail.push((node, first_char(&edge.label), key.len()));
            key.push_str(&edge.label);
            rest = &rest[edge.label.len()..];
            node = edge.child;
            continue;
        }

        // `from` diverges from the trie inside this node.
        if let Some(pos) = find_sibling_by_first_char(nodes, node, rest) {
            let label = &nodes.get(node).children[pos].label;
            if compare_str(order, label, rest) == Ordering::Greater {
                return Some(descend(nodes, order, key, node, pos));
            }
        }
        if let Some(pos) = next_edge(nodes, order, node, Some(first_char(rest))) {
            return Some(descend(nodes, order, key, node, pos));
        }
        break;
    }

    while let Some((parent, taken, len)) = trail.pop() {
        key.truncate(len);
        if let Some(pos) = next_edge(nodes, order, parent, Some(taken)) {
            return Some(descend(nodes, order, key, parent, pos));
        }
    }
    None
}

/// Position of the smallest edge of `node` whose first character comes
/// strictly after `after` (any edge when `after` is `None`).
fn next_edge<V, O: CharOrder>(
    nodes: &NodeArena<V>,
    order: &O,
    node: NodeId,
    after: Option<char>,
) -> Option<usize> {
    let mut best: Option<(usize, char)> = None;
    for (pos, edge) in nodes.get(node).children.iter().enumerate() {
        let c = first_char(&edge.label);
        if after.is_some_and(|after| order.compare(c, after) != Ordering::Greater) {
            continue;
        }
        if best.map_or(true, |(_, best_c)| order.compare(c, best_c) == Ordering::Less) {
            best = Some((pos, c));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Follows `node.children[pos]` and then the smallest edges down to the
/// first value-bearing node, extending `key` with every label.
fn descend<V, O: CharOrder>(
    nodes: &NodeArena<V>,
    order: &O,
    mut key: String,
    node: NodeId,
    pos: usize,
) -> (String, NodeId) {
    let edge = &nodes.get(node).children[pos];
    key.push_str(&edge.label);
    let mut node = edge.child;
    while !nodes.get(node).has_value() {
        let Some(pos) = next_edge(nodes, order, node, None) else {
            break;
        };
        let edge = &nodes.get(node).children[pos];
        key.push_str(&edge.label);
        node = edge.child;
    }
    (key, node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<V: Clone, O: CharOrder>(cursor: &mut Cursor, map: &TrieMap<V, O>) -> Vec<(String, V)> {
        let mut out = Vec::new();
        while let Some((key, value)) = cursor.advance(map) {
            out.push((key, value.clone()));
        }
        out
    }

    fn entries(pairs: &[(&str, i32)]) -> Vec<(String, i32)> {
        pairs.iter().map(|&(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn test_cursor_empty_map() {
        let map: TrieMap<i32> = TrieMap::new();
        let mut cursor = Cursor::new();
        assert_eq!(cursor.advance(&map), None);
        assert!(cursor.is_done());
        assert_eq!(cursor.advance(&map), None);
    }

    #[test]
    fn test_cursor_orders_keys() {
        let map: TrieMap<i32> = [("", 0), ("a", 1), ("aac", 4), ("aaa", 2), ("aab", 3)]
            .into_iter()
            .collect();
        let mut cursor = Cursor::new();
        assert_eq!(
            collect(&mut cursor, &map),
            entries(&[("", 0), ("a", 1), ("aaa", 2), ("aab", 3), ("aac", 4)])
        );
    }

    #[test]
    fn test_cursor_skips_removed_and_finds_inserted() {
        let mut map: TrieMap<i32> = [("bye", 0), ("he", 1), ("hell", 2), ("hello", 3)]
            .into_iter()
            .collect();
        let mut cursor = Cursor::new();
        assert_eq!(cursor.advance(&map), Some(("bye".to_owned(), &0)));

        map.remove("he");
        map.insert("cat", 9);
        assert_eq!(
            collect(&mut cursor, &map),
            entries(&[("cat", 9), ("hell", 2), ("hello", 3)])
        );
    }

    #[test]
    fn test_cursor_resumes_after_merge() {
        // Removing "hell" merges "hell" + "o" into a single edge under "he".
        let mut map: TrieMap<i32> = [("he", 1), ("hell", 2), ("hello", 3), ("hey", 4)]
            .into_iter()
            .collect();
        let mut cursor = Cursor::new();
        cursor.advance(&map);
        assert_eq!(cursor.advance(&map), Some(("hell".to_owned(), &2)));

        map.remove("hell");
        assert_eq!(collect(&mut cursor, &map), entries(&[("hello", 3), ("hey", 4)]));
    }

    #[test]
    fn test_cursor_resumes_after_split() {
        let mut map: TrieMap<i32> = [("hello", 1), ("world", 2)].into_iter().collect();
        let mut cursor = Cursor::new();
        assert_eq!(cursor.advance(&map), Some(("hello".to_owned(), &1)));

        // Splits the "hello" edge above the cursor's position.
        map.insert("help", 3);
        map.insert("hem", 4);
        map.insert("hellp", 5);
        assert_eq!(
            collect(&mut cursor, &map),
            entries(&[("hellp", 5), ("help", 3), ("hem", 4), ("world", 2)])
        );
    }

    #[test]
    fn test_cursor_after_clear() {
        let mut map: TrieMap<i32> = [("hi", 2), ("hello", 0)].into_iter().collect();
        let mut first = Cursor::new();
        let mut second = Cursor::new();
        assert_eq!(first.advance(&map), Some(("hello".to_owned(), &0)));

        map.clear();
        map.insert("he", 0);
        map.insert("hey", 1);
        assert_eq!(collect(&mut first, &map), entries(&[("hey", 1)]));
        assert_eq!(collect(&mut second, &map), entries(&[("he", 0), ("hey", 1)]));
    }

    #[test]
    fn test_cursor_reinserted_last_key_is_not_repeated() {
        let mut map: TrieMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let mut cursor = Cursor::new();
        assert_eq!(cursor.advance(&map), Some(("a".to_owned(), &1)));
        map.remove("a");
        map.insert("a", 10);
        assert_eq!(cursor.last_key(), Some("a"));
        assert_eq!(collect(&mut cursor, &map), entries(&[("b", 2)]));
    }

    #[test]
    fn test_cursor_with_prefix() {
        let map: TrieMap<i32> = [("he", 1), ("hell", 2), ("hello", 3), ("help", 4), ("hi", 5)]
            .into_iter()
            .collect();
        let mut cursor = Cursor::with_prefix("hel");
        assert_eq!(
            collect(&mut cursor, &map),
            entries(&[("hell", 2), ("hello", 3), ("help", 4)])
        );

        let mut cursor = Cursor::with_prefix("x");
        assert_eq!(cursor.advance(&map), None);
    }

    #[test]
    fn test_cursor_custom_order() {
        let reversed = |a: char, b: char| b.cmp(&a);
        let mut map = TrieMap::with_order(reversed);
        for (key, value) in [("a", 1), ("ab", 2), ("b", 3), ("ba", 4), ("", 0)] {
            map.insert(key, value);
        }
        let mut cursor = Cursor::new();
        assert_eq!(
            collect(&mut cursor, &map),
            entries(&[("", 0), ("b", 3), ("ba", 4), ("a", 1), ("ab", 2)])
        );
    }

    #[test]
    fn test_exhausted_cursor_stays_done() {
        let mut map: TrieMap<i32> = [("a", 1)].into_iter().collect();
        let mut cursor = Cursor::new();
        cursor.advance(&map);
        assert_eq!(cursor.advance(&map), None);
        map.insert("b", 2);
        assert_eq!(cursor.advance(&map), None);

        let mut cursor = Cursor::exhausted();
        assert_eq!(cursor.advance(&map), None);
        assert_eq!(cursor.last_key(), None);
    }
}
