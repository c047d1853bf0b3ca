//! # jnode-core
//!
//! Navigable tree nodes over schema-less JSON.
//!
//! `jnode-core` lets callers pluck or patch a few fields out of loosely structured
//! JSON without defining record types. A document is decoded once into a root
//! [`JsonNode`]; [`JsonNode::select`] walks down by a flat list of keys and array
//! indices, and the node it returns can be read, overwritten, deleted or iterated.
//! Writes land in the shared document immediately, so every node of that document
//! observes them.
//!
//! ## Quick start
//!
//! ```rust
//! use jnode_core::JsonNode;
//!
//! let mut root = JsonNode::parse(r#"{"a":{"b":[1,2,3]}}"#);
//!
//! let mut second = root.select(&["a", "b", "1"]);
//! assert_eq!(second.as_i64(), Some(2));
//!
//! second.set(99);
//! assert_eq!(root.select(&["a", "b", "1"]).as_i64(), Some(99));
//! assert_eq!(root.to_json_string().unwrap(), r#"{"a":{"b":[1,99,3]}}"#);
//! ```
//!
//! ## Errors
//!
//! Failures are recorded on the node instead of being returned from chaining
//! methods. Check [`JsonNode::error`] at the end of a chain; operations on a node that
//! already carries an error do nothing and keep that error.
//!
//! ```rust
//! use jnode_core::{JsonNode, NodeError};
//!
//! let mut root = JsonNode::parse(r#"{"a":{"b":[1,2,3]}}"#);
//! let node = root.select(&["a", "b", "one"]);
//! assert!(matches!(node.error(), Some(NodeError::Index { .. })));
//! ```
//!
//! ## Modules
//!
//! - [`node`] — `JsonNode`: select, set, delete, exists, typed extraction
//! - [`cursor`] — `ArrayCursor`: position-based iteration over array nodes
//! - [`codec`] — the `serde_json` adapter for text ↔ value conversion
//! - [`error`] — Error kinds recorded on nodes

pub mod codec;
pub mod cursor;
pub mod error;
pub mod node;

pub use cursor::ArrayCursor;
pub use error::{NodeError, Result};
pub use node::JsonNode;
pub use serde_json::Value;
