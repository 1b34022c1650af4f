//! Compact radix trie map over string keys.
//!
//! Nodes live in an arena owned by the map and edges refer to them by index.
//! Each edge carries a non-empty label, no two labels of a node share their
//! first character, and every node except the root either stores a value or
//! branches into at least two children.

pub mod cursor;
pub mod graph;
pub mod iter;
pub mod map;
pub(crate) mod node;
pub mod order;
pub(crate) mod path;
pub mod prefix;

pub use cursor::Cursor;
pub use graph::{Graph, NodeRef};
pub use iter::{Iter, Keys, Values};
pub use map::TrieMap;
pub use order::{CharOrder, CodePointOrder};
