//! # `trie-mapping` - ordered string map on a compact trie
//!
//! A map from `str` keys to values, stored as a radix trie whose
//! single-child chains are merged into labeled edges. On top of the usual
//! map operations it provides:
//!
//! - **Ordered traversal**: keys come out in lexicographic order under a
//!   configurable [`CharOrder`] (code point order by default).
//! - **Prefix queries**: the stored keys that are prefixes of a string
//!   ([`TrieMap::prefixes_of`]) and the stored keys that start with a string
//!   ([`TrieMap::prefixed_with`]).
//! - **Mutation-tolerant cursors**: a [`Cursor`] does not borrow the map
//!   between steps and re-derives its position from the last key it
//!   yielded, so entries can be inserted and removed mid-traversal.
//! - **Graph interop**: the node structure can be exported to and adopted
//!   from a plain [`Graph`] that implements `serde` traits.
//!
//! ## Example
//!
//! ```rust
//! use trie_mapping::{Cursor, TrieMap};
//!
//! let mut map = TrieMap::new();
//! for (key, value) in [("he", 1), ("hey", 5), ("hells", 4), ("hello", 3), ("hell", 2), ("bye", 0)] {
//!     map.insert(key, value);
//! }
//!
//! assert_eq!(
//!     map.keys().collect::<Vec<_>>(),
//!     ["bye", "he", "hell", "hello", "hells", "hey"]
//! );
//! assert_eq!(map.prefixes_of("hello"), [("he", &1), ("hell", &2), ("hello", &3)]);
//! assert_eq!(
//!     map.prefixed_with("hell").map(|(key, _)| key).collect::<Vec<_>>(),
//!     ["hell", "hello", "hells"]
//! );
//!
//! // Cursors survive mutation between steps.
//! let mut cursor = Cursor::new();
//! assert_eq!(cursor.advance(&map), Some(("bye".to_owned(), &0)));
//! map.remove("he");
//! map.insert("cat", 9);
//! assert_eq!(cursor.advance(&map), Some(("cat".to_owned(), &9)));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `trace`/`debug` events for structural changes (edge
//!   splits and merges, clears, graph adoption).

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod log;

pub mod error;
pub mod trie;

pub use error::TrieError;
pub use trie::{CharOrder, CodePointOrder, Cursor, Graph, Iter, Keys, NodeRef, TrieMap, Values};
