//! # Domain Errors
//!
//! Errors raised while building or navigating the entry graph.

use shared_types::{EncodingError, Hash};
use thiserror::Error;

/// Errors from entry construction and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// A referenced entry is not in the transaction's entry map.
    #[error("missing entry {id}")]
    MissingEntry { id: Hash },

    /// An entry exists but has the wrong type for the reference.
    #[error("entry {id} is {actual}, expected {expected}")]
    EntryType {
        id: Hash,
        expected: &'static str,
        actual: &'static str,
    },

    /// Input index does not name a spend or issuance.
    #[error("input index {index} out of range ({count} inputs)")]
    InputIndex { index: usize, count: usize },

    /// Merkle proof requested for a leaf that does not exist.
    #[error("leaf index {index} out of range ({count} leaves)")]
    LeafIndex { index: usize, count: usize },

    /// A field could not be encoded for hashing.
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),
}

/// Result type for entry operations.
pub type EntryResult<T> = Result<T, EntryError>;
