//! Error type for adopting externally supplied node graphs.
//!
//! Lookups and removals of absent keys are not errors; they return `None`
//! or `false`. The only fallible operation in the crate is
//! [`TrieMap::from_graph`](crate::TrieMap::from_graph), which rejects graphs
//! whose edge labels would make lookups ambiguous.

use core::fmt;

/// The error type for invalid adopted graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// An edge carries the empty label, which can never be reached by a key.
    EmptyLabel {
        /// Concatenated labels from the root to the offending node.
        path: String,
    },
    /// Two edges of the same node start with the same character.
    SharedFirstChar {
        /// Concatenated labels from the root to the offending node.
        path: String,
        /// The first of the two clashing labels.
        first: String,
        /// The second of the two clashing labels.
        second: String,
    },
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel { path } => {
                write!(f, "empty edge label below {path:?}")
            }
            Self::SharedFirstChar {
                path,
                first,
                second,
            } => write!(
                f,
                "edge labels {first:?} and {second:?} below {path:?} share their first character"
            ),
        }
    }
}

impl std::error::Error for TrieError {}
