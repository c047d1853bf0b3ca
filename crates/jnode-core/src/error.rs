//! Error types for JSON tree navigation and mutation.
//!
//! Errors are carried as data on a [`crate::JsonNode`] (the "sticky" error slot)
//! rather than unwound through the call stack, so every variant is `Clone` and
//! stores the codec's message instead of the codec error itself.

use thiserror::Error;

/// Errors that can be recorded on a node or returned from extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The input text was not valid JSON.
    /// `line` and `column` are 1-based, as reported by the codec.
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// An array was indexed with a segment that is not a base-10 integer,
    /// or with an index outside the array bounds.
    #[error("Invalid array index [{index}]: {reason}")]
    Index { index: String, reason: String },

    /// A path still had segments left when a string, number, bool or null was reached.
    #[error("Can't index into primitive value [{segment}]")]
    NotIndexable { segment: String },

    /// An operation required a different value kind (e.g. iterating a non-array).
    #[error("Type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// The value could not be encoded back to JSON.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// The encoded value could not be decoded into the requested shape.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The operation has no meaning for this node (e.g. deleting the root).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl NodeError {
    pub(crate) fn index(index: &str, reason: impl Into<String>) -> Self {
        NodeError::Index {
            index: index.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_indexable(segment: &str) -> Self {
        NodeError::NotIndexable {
            segment: segment.to_string(),
        }
    }
}

/// Convenience alias used throughout jnode-core.
pub type Result<T> = std::result::Result<T, NodeError>;
