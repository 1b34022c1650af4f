//! Borrowing iterators and collection trait impls.

use core::iter::FusedIterator;

use super::cursor::Cursor;
use super::map::TrieMap;
use super::order::{CharOrder, CodePointOrder};

/// Iterator over the entries of a [`TrieMap`] in key order.
/// Yields `(String, &V)`.
///
/// Created by [`TrieMap::iter`] and [`TrieMap::prefixed_with`]. The map is
/// borrowed for the iterator's lifetime; use a [`Cursor`] to traverse while
/// mutating.
pub struct Iter<'a, V, O = CodePointOrder> {
    map: &'a TrieMap<V, O>,
    cursor: Cursor,
}

impl<'a, V, O: CharOrder> Iter<'a, V, O> {
    pub(crate) fn new(map: &'a TrieMap<V, O>, cursor: Cursor) -> Self {
        Self { map, cursor }
    }
}

impl<V, O> Clone for Iter<'_, V, O> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            cursor: self.cursor.clone(),
        }
    }
}

impl<'a, V, O: CharOrder> Iterator for Iter<'a, V, O> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(self.map)
    }
}

impl<V, O: CharOrder> FusedIterator for Iter<'_, V, O> {}

/// Iterator over the keys of a [`TrieMap`] in order.
pub struct Keys<'a, V, O = CodePointOrder> {
    inner: Iter<'a, V, O>,
}

impl<'a, V, O: CharOrder> Iterator for Keys<'a, V, O> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<V, O: CharOrder> FusedIterator for Keys<'_, V, O> {}

/// Iterator over the values of a [`TrieMap`] in key order.
pub struct Values<'a, V, O = CodePointOrder> {
    inner: Iter<'a, V, O>,
}

impl<'a, V, O: CharOrder> Iterator for Values<'a, V, O> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }
}

impl<V, O: CharOrder> FusedIterator for Values<'_, V, O> {}

impl<V, O: CharOrder> TrieMap<V, O> {
    /// Returns an iterator over `(key, &value)` pairs in key order.
    pub fn iter(&self) -> Iter<'_, V, O> {
        Iter::new(self, Cursor::new())
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> Keys<'_, V, O> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> Values<'_, V, O> {
        Values { inner: self.iter() }
    }
}

impl<'a, V, O: CharOrder> IntoIterator for &'a TrieMap<V, O> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, O> FromIterator<(K, V)> for TrieMap<V, O>
where
    K: AsRef<str>,
    O: CharOrder + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, O> Extend<(K, V)> for TrieMap<V, O>
where
    K: AsRef<str>,
    O: CharOrder,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
