//! Position-based cursor over the elements of an array node.
//!
//! The cursor starts before the first element and must be advanced before
//! [`ArrayCursor::current`] or [`ArrayCursor::current_node`] return anything. Nodes it
//! produces are linked to the array it was created from, so `set` and `delete` on
//! them edit that array in place.
//!
//! The element count is captured when the cursor is created. Deleting elements while
//! iterating leaves `size()` stale and shifts later elements under the cursor; the
//! cursor does not detect either.

use crate::node::JsonNode;
use serde_json::Value;

/// Restartable iterator over an array node. Create one with [`JsonNode::iter`].
///
/// ```
/// use jnode_core::JsonNode;
///
/// let mut root = JsonNode::parse(r#"{"arr":[{"name":"abbot"},{"name":"costello"}]}"#);
/// let mut cursor = root.select(&["arr"]).iter().unwrap();
///
/// let mut names = Vec::new();
/// while cursor.advance() {
///     let mut element = cursor.current_node().unwrap();
///     names.push(element.select(&["name"]).to_string_value().unwrap());
/// }
/// assert_eq!(names, ["abbot", "costello"]);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayCursor {
    source: JsonNode,
    position: Option<usize>,
    size: usize,
}

impl ArrayCursor {
    pub(crate) fn new(source: JsonNode, size: usize) -> Self {
        ArrayCursor {
            source,
            position: None,
            size,
        }
    }

    /// Move to the next element. Returns whether the cursor now points inside the
    /// array. Once past the end it stays there.
    pub fn advance(&mut self) -> bool {
        let next = match self.position {
            None => 0,
            Some(pos) => (pos + 1).min(self.size),
        };
        self.position = Some(next);
        next < self.size
    }

    /// The element under the cursor, or `None` before the first `advance` and after
    /// the last element.
    pub fn current(&self) -> Option<Value> {
        let pos = self.valid_position()?;
        self.source.lookup(&[pos.to_string()])
    }

    /// The element under the cursor as a node linked to the source array.
    pub fn current_node(&self) -> Option<JsonNode> {
        let pos = self.valid_position()?;
        Some(self.source.child(pos.to_string(), true))
    }

    /// Element count captured when the cursor was created.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the element under the cursor, `None` before the first `advance`.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Rewind to before the first element.
    pub fn reset(&mut self) {
        self.position = None;
    }

    /// The array node this cursor walks.
    pub fn source(&self) -> &JsonNode {
        &self.source
    }

    fn valid_position(&self) -> Option<usize> {
        self.position.filter(|pos| *pos < self.size)
    }
}

impl Iterator for ArrayCursor {
    type Item = JsonNode;

    fn next(&mut self) -> Option<JsonNode> {
        if self.advance() {
            self.current_node()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let consumed = self.position.map_or(0, |pos| pos + 1).min(self.size);
        let remaining = self.size - consumed;
        (remaining, Some(remaining))
    }
}
