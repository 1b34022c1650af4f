//! Character orders.
//!
//! A [`TrieMap`](super::TrieMap) orders keys by comparing them character by
//! character under a [`CharOrder`]; a key sorts before all of its
//! extensions. The order is chosen when the map is built and never changes.

use core::cmp::Ordering;

/// A total order over single characters.
///
/// Implemented for every `Fn(char, char) -> Ordering`, so closures and
/// function pointers can be passed directly:
///
/// ```rust
/// use trie_mapping::TrieMap;
///
/// let mut map = TrieMap::with_order(|a: char, b: char| b.cmp(&a));
/// map.insert("a", 1);
/// map.insert("b", 2);
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
/// ```
pub trait CharOrder {
    /// Compares two characters.
    fn compare(&self, a: char, b: char) -> Ordering;
}

/// Orders characters by Unicode code point. The default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CodePointOrder;

impl CharOrder for CodePointOrder {
    #[inline]
    fn compare(&self, a: char, b: char) -> Ordering {
        a.cmp(&b)
    }
}

impl<F> CharOrder for F
where
    F: Fn(char, char) -> Ordering,
{
    #[inline]
    fn compare(&self, a: char, b: char) -> Ordering {
        self(a, b)
    }
}

/// Compares two strings lexicographically under `order`.
pub(crate) fn compare_str<O: CharOrder + ?Sized>(order: &O, a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars();
    let mut b_chars = b.chars();
    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some(x), Some(y)) => match order.compare(x, y) {
                Ordering::Equal => {}
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// First character of a label. Labels are never empty.
#[inline]
pub(crate) fn first_char(label: &str) -> char {
    label.chars().next().unwrap_or('\0')
}
