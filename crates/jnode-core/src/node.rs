//! Tree nodes — located views into a shared JSON document.
//!
//! A [`JsonNode`] does not own a copy of its value. Every node derived from the same
//! root holds a reference-counted handle to one document plus the index path that
//! locates the node inside it. Reading a node resolves that path; writing through
//! a node (`set`, `delete`) edits the parent container in place, so the change is
//! visible through every other node of the same document.
//!
//! # Key design decisions
//!
//! - **Index path as parent link**: the parent of a node is its path minus the last
//!   segment. There are no pointers between nodes and no reference cycles.
//! - **Sticky errors**: failures are recorded on the node (`error()`) instead of being
//!   returned from chaining methods. Every operation on a node that already carries an
//!   error is a no-op that hands the same error back.
//! - **Absent keys read as null**: selecting a missing object key yields a node whose
//!   value is `null`. [`JsonNode::lookup`] is the strict alternative that tells the two
//!   apart.
//! - **No invalidation**: deleting an array element shifts later indices down, and
//!   nodes or cursors created before the delete keep their old index. Replacing the
//!   root value makes existing descendants resolve against the new tree.

use crate::codec;
use crate::cursor::ArrayCursor;
use crate::error::{NodeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A located, mutable view into a JSON document.
///
/// Cloning a node is cheap and yields another view of the same location in the
/// same document; the clone carries a copy of the sticky error slot.
#[derive(Debug, Clone)]
pub struct JsonNode {
    doc: Rc<RefCell<Value>>,
    path: Vec<String>,
    parent_is_array: bool,
    error: Option<NodeError>,
}

impl JsonNode {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Decode raw JSON bytes into a root node.
    ///
    /// Malformed input does not fail the call: the returned node wraps `null` and
    /// carries a [`NodeError::Parse`] in its error slot.
    ///
    /// ```
    /// use jnode_core::JsonNode;
    ///
    /// let root = JsonNode::from_bytes(br#"{"name":"abbot"}"#);
    /// assert!(!root.has_error());
    ///
    /// let broken = JsonNode::from_bytes(br#"{"name":"#);
    /// assert!(broken.has_error());
    /// assert!(broken.is_null());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match codec::decode(bytes) {
            Ok(value) => Self::wrap(value),
            Err(err) => {
                log::debug!("jnode: failed to decode document: {err}");
                let mut root = Self::wrap(Value::Null);
                root.error = Some(err);
                root
            }
        }
    }

    /// Decode JSON text into a root node. See [`JsonNode::from_bytes`].
    pub fn parse(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Wrap an already decoded value as a root node.
    pub fn wrap(value: Value) -> Self {
        JsonNode {
            doc: Rc::new(RefCell::new(value)),
            path: Vec::new(),
            parent_is_array: false,
            error: None,
        }
    }

    /// A node one level below `self`, linked through the same document.
    pub(crate) fn child(&self, key: String, parent_is_array: bool) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(key);
        JsonNode {
            doc: Rc::clone(&self.doc),
            path,
            parent_is_array,
            error: None,
        }
    }

    // ========================================================================
    // Location and error state
    // ========================================================================

    /// Key (or stringified index) of this node inside its parent; empty for the root.
    pub fn key(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// Full path from the document root to this node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether this node's value sits inside an array one level up.
    pub fn parent_is_array(&self) -> bool {
        self.parent_is_array
    }

    /// The node whose container holds this node's value, or `None` for the root.
    pub fn parent(&self) -> Option<JsonNode> {
        let (_, parent_path) = self.path.split_last()?;
        let parent_is_array = match parent_path.split_last() {
            Some((_, grandparent_path)) => matches!(
                resolve(&self.doc.borrow(), grandparent_path),
                Some(Value::Array(_))
            ),
            None => false,
        };
        Some(JsonNode {
            doc: Rc::clone(&self.doc),
            path: parent_path.to_vec(),
            parent_is_array,
            error: None,
        })
    }

    /// A root node over the same document this node belongs to.
    pub fn document(&self) -> JsonNode {
        JsonNode {
            doc: Rc::clone(&self.doc),
            path: Vec::new(),
            parent_is_array: false,
            error: None,
        }
    }

    /// The sticky error recorded on this node, if any.
    pub fn error(&self) -> Option<&NodeError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Remove and return the sticky error, making the node usable again.
    pub fn clear_error(&mut self) -> Option<NodeError> {
        self.error.take()
    }

    fn record(&mut self, err: NodeError) {
        log::debug!("jnode: error at {}: {err}", self.location());
        self.error = Some(err);
    }

    /// Human-readable location used in log lines, e.g. `$/a/b/1`.
    fn location(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Walk down the tree one path segment at a time.
    ///
    /// Object segments are keys; array segments are base-10 indices. A missing object
    /// key yields a node wrapping `null`. On failure the error is recorded on `self`
    /// and a copy of `self` (carrying that error) is returned, so callers check
    /// [`JsonNode::error`] on the result rather than assuming a fresh node.
    ///
    /// ```
    /// use jnode_core::JsonNode;
    ///
    /// let mut root = JsonNode::parse(r#"{"a":{"b":[1,2,3]}}"#);
    /// let node = root.select(&["a", "b", "1"]);
    /// assert_eq!(node.as_i64(), Some(2));
    ///
    /// let missing = root.select(&["a", "missing", "x"]);
    /// assert!(missing.has_error());
    /// assert!(root.has_error());
    /// ```
    pub fn select<S: AsRef<str>>(&mut self, path: &[S]) -> JsonNode {
        if self.error.is_some() || path.is_empty() {
            return self.clone();
        }
        match self.walk(path) {
            Ok(node) => node,
            Err(err) => {
                self.record(err);
                self.clone()
            }
        }
    }

    fn walk<S: AsRef<str>>(&self, path: &[S]) -> Result<JsonNode> {
        let doc = self.doc.borrow();
        let mut current = resolve(&doc, &self.path);
        let mut node_path = self.path.clone();
        let mut parent_is_array = self.parent_is_array;

        for segment in path {
            let segment = segment.as_ref();
            let key = match current {
                Some(Value::Array(items)) => {
                    let idx = parse_index(segment, items.len())?;
                    current = items.get(idx);
                    parent_is_array = true;
                    idx.to_string()
                }
                Some(Value::Object(map)) => {
                    current = map.get(segment);
                    parent_is_array = false;
                    segment.to_string()
                }
                // Primitives, and keys that were absent one level up.
                _ => return Err(NodeError::not_indexable(segment)),
            };
            node_path.push(key);
        }

        Ok(JsonNode {
            doc: Rc::clone(&self.doc),
            path: node_path,
            parent_is_array,
            error: None,
        })
    }

    /// Whether `path` resolves to a non-null value.
    ///
    /// Absent keys and explicit `null` both report `false`. A failed walk records its
    /// error on `self`, exactly as [`JsonNode::select`] does.
    pub fn exists<S: AsRef<str>>(&mut self, path: &[S]) -> bool {
        let node = self.select(path);
        !node.has_error() && !node.is_null()
    }

    /// Strict lookup that tells an absent key apart from an explicit `null`.
    ///
    /// Returns `None` when any segment is missing or cannot be walked; never touches
    /// the error slot.
    ///
    /// ```
    /// use jnode_core::JsonNode;
    /// use serde_json::Value;
    ///
    /// let root = JsonNode::parse(r#"{"present":null}"#);
    /// assert_eq!(root.lookup(&["present"]), Some(Value::Null));
    /// assert_eq!(root.lookup(&["absent"]), None);
    /// ```
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        if self.error.is_some() {
            return None;
        }
        let doc = self.doc.borrow();
        let mut current = resolve(&doc, &self.path)?;
        for segment in path {
            let segment = segment.as_ref();
            current = match current {
                Value::Array(items) => items.get(parse_index(segment, items.len()).ok()?)?,
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Iterate the elements of an array node.
    ///
    /// Fails with [`NodeError::Type`] (also recorded on the node) when the value is
    /// not an array, and with the sticky error when one is already set.
    pub fn iter(&mut self) -> Result<ArrayCursor> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let size = match resolve(&self.doc.borrow(), &self.path) {
            Some(Value::Array(items)) => Ok(items.len()),
            Some(other) => Err(codec::kind_name(other)),
            None => Err("null"),
        };
        match size {
            Ok(size) => Ok(ArrayCursor::new(self.clone(), size)),
            Err(found) => {
                let err = NodeError::Type {
                    expected: "array",
                    found,
                };
                self.record(err.clone());
                Err(err)
            }
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Write `value` at this node's location.
    ///
    /// A node with a parent overwrites its slot in the parent container; the root
    /// replaces the whole document. Returns `self` for chaining; failures are recorded
    /// on the node and leave the document untouched.
    ///
    /// ```
    /// use jnode_core::JsonNode;
    ///
    /// let mut root = JsonNode::parse(r#"{"a":{"b":[1,2,3]}}"#);
    /// root.select(&["a", "b", "1"]).set(99);
    /// assert_eq!(root.to_string(), r#"{"a":{"b":[1,99,3]}}"#);
    /// ```
    pub fn set(&mut self, value: impl Into<Value>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let value = value.into();
        log::trace!("jnode: set {}", self.location());
        let written = write_slot(&mut self.doc.borrow_mut(), &self.path, value);
        if let Err(err) = written {
            self.record(err);
        }
        self
    }

    /// Serialize `value` with the codec and write it at this node's location.
    pub fn set_serialized<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match codec::to_value(value) {
            Ok(value) => self.set(value),
            Err(err) => {
                self.record(err);
                self
            }
        }
    }

    /// Remove this node's value from its parent container.
    ///
    /// Object keys are removed outright; array elements are removed and later elements
    /// shift down by one. Deleting the root fails with [`NodeError::InvalidOperation`].
    pub fn delete(&mut self) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        log::trace!("jnode: delete {}", self.location());
        let removed = remove_slot(&mut self.doc.borrow_mut(), &self.path);
        if let Err(err) = removed {
            self.record(err);
        }
        self
    }

    // ========================================================================
    // Extraction
    // ========================================================================

    /// A copy of the value this node currently denotes.
    ///
    /// `null` when the location is absent or the node carries an error.
    pub fn value(&self) -> Value {
        self.with_value(Value::clone).unwrap_or(Value::Null)
    }

    /// Decode the value into a concrete type by way of an encode/decode round trip.
    ///
    /// Returns the sticky error when one is set.
    ///
    /// ```
    /// use jnode_core::JsonNode;
    ///
    /// let mut root = JsonNode::parse(r#"{"_source":{"docid":123}}"#);
    /// let docid: f64 = root.select(&["_source", "docid"]).decode_into().unwrap();
    /// assert_eq!(docid, 123.0);
    /// ```
    pub fn decode_into<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        codec::decode_into(&self.value())
    }

    /// Compact JSON text of the value, or the sticky error when one is set.
    pub fn to_json_string(&self) -> Result<String> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        codec::encode(&self.value())
    }

    /// Indented JSON text of the value, or the sticky error when one is set.
    pub fn to_json_pretty(&self) -> Result<String> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        codec::encode_pretty(&self.value())
    }

    /// An owned copy of a string value. `None` for other kinds and on errored nodes.
    pub fn to_string_value(&self) -> Option<String> {
        self.with_value(|v| v.as_str().map(str::to_owned)).flatten()
    }

    /// `None` for non-numbers and on errored nodes.
    pub fn as_f64(&self) -> Option<f64> {
        self.with_value(Value::as_f64).flatten()
    }

    /// `None` for non-integers, values outside `i64`, and on errored nodes.
    pub fn as_i64(&self) -> Option<i64> {
        self.with_value(Value::as_i64).flatten()
    }

    /// `None` for negative or non-integer values, and on errored nodes.
    pub fn as_u64(&self) -> Option<u64> {
        self.with_value(Value::as_u64).flatten()
    }

    /// `None` for non-booleans and on errored nodes.
    pub fn as_bool(&self) -> Option<bool> {
        self.with_value(Value::as_bool).flatten()
    }

    /// True for explicit `null`, for locations that do not exist, and on errored nodes.
    pub fn is_null(&self) -> bool {
        self.with_value(Value::is_null).unwrap_or(true)
    }

    /// Whether this node's own value is an array. False on errored nodes.
    pub fn is_array(&self) -> bool {
        self.with_value(Value::is_array).unwrap_or(false)
    }

    /// False on errored nodes.
    pub fn is_object(&self) -> bool {
        self.with_value(Value::is_object).unwrap_or(false)
    }

    /// Number of elements of an array or entries of an object; 0 for anything else
    /// and on errored nodes.
    pub fn len(&self) -> usize {
        self.with_value(|v| match v {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => 0,
        })
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against the resolved value without cloning it. `None` when the node
    /// carries an error or the location is absent. The document borrow ends before
    /// this returns.
    fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> Option<R> {
        if self.error.is_some() {
            return None;
        }
        resolve(&self.doc.borrow(), &self.path).map(f)
    }
}

impl From<Value> for JsonNode {
    fn from(value: Value) -> Self {
        JsonNode::wrap(value)
    }
}

impl fmt::Display for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = &self.error {
            return write!(f, "[JsonNode error: {err}]");
        }
        match codec::encode(&self.value()) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "[JsonNode error: {err}]"),
        }
    }
}

// ============================================================================
// Path resolution over the shared document
// ============================================================================

/// Parse an array segment as a base-10 index within `len`.
fn parse_index(segment: &str, len: usize) -> Result<usize> {
    let idx: usize = segment
        .parse()
        .map_err(|_| NodeError::index(segment, "not a non-negative base-10 integer"))?;
    if idx >= len {
        return Err(NodeError::index(
            segment,
            format!("out of range for array of length {len}"),
        ));
    }
    Ok(idx)
}

/// Follow a stored node path. `None` when any step no longer exists.
fn resolve<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for step in path {
        current = match current {
            Value::Array(items) => items.get(step.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(step)?,
            _ => return None,
        };
    }
    Some(current)
}

fn resolve_mut<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = root;
    for step in path {
        current = match current {
            Value::Array(items) => items.get_mut(step.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get_mut(step)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Locate the container holding `path`'s last segment.
fn parent_container<'a>(
    root: &'a mut Value,
    path: &'a [String],
) -> Result<(&'a mut Value, &'a str)> {
    let (key, parent_path) = path
        .split_last()
        .ok_or_else(|| NodeError::InvalidOperation("node has no parent".to_string()))?;
    let parent = resolve_mut(root, parent_path).ok_or_else(|| {
        NodeError::InvalidOperation(format!("parent of [{key}] no longer exists"))
    })?;
    Ok((parent, key.as_str()))
}

fn write_slot(root: &mut Value, path: &[String], value: Value) -> Result<()> {
    if path.is_empty() {
        *root = value;
        return Ok(());
    }
    let (parent, key) = parent_container(root, path)?;
    match parent {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let idx = parse_index(key, items.len())?;
            items[idx] = value;
            Ok(())
        }
        _ => Err(NodeError::not_indexable(key)),
    }
}

fn remove_slot(root: &mut Value, path: &[String]) -> Result<()> {
    if path.is_empty() {
        return Err(NodeError::InvalidOperation(
            "cannot delete the root node".to_string(),
        ));
    }
    let (parent, key) = parent_container(root, path)?;
    match parent {
        Value::Object(map) => {
            map.shift_remove(key);
            Ok(())
        }
        Value::Array(items) => {
            let idx = parse_index(key, items.len())?;
            items.remove(idx);
            Ok(())
        }
        _ => Err(NodeError::not_indexable(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_walks_objects_and_arrays() {
        let doc = json!({"a": [{"b": true}]});
        assert_eq!(resolve(&doc, &path(&["a", "0", "b"])), Some(&json!(true)));
        assert_eq!(resolve(&doc, &path(&["a", "1"])), None);
        assert_eq!(resolve(&doc, &path(&["a", "0", "b", "c"])), None);
    }

    #[test]
    fn parse_index_rejects_garbage_and_out_of_range() {
        assert_eq!(parse_index("2", 3).unwrap(), 2);
        assert!(matches!(parse_index("x", 3), Err(NodeError::Index { .. })));
        assert!(matches!(parse_index("-1", 3), Err(NodeError::Index { .. })));
        assert!(matches!(parse_index("3", 3), Err(NodeError::Index { .. })));
    }

    #[test]
    fn write_slot_on_empty_path_replaces_root() {
        let mut doc = json!({"a": 1});
        write_slot(&mut doc, &[], json!([1, 2])).unwrap();
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn write_slot_into_primitive_parent_fails() {
        let mut doc = json!({"a": 1});
        let err = write_slot(&mut doc, &path(&["a", "b"]), json!(2)).unwrap_err();
        assert_eq!(err, NodeError::not_indexable("b"));
    }

    #[test]
    fn remove_slot_reports_vanished_parent() {
        let mut doc = json!({"a": {}});
        let err = remove_slot(&mut doc, &path(&["gone", "b"])).unwrap_err();
        assert!(matches!(err, NodeError::InvalidOperation(_)));
    }

    #[test]
    fn location_renders_path() {
        let root = JsonNode::wrap(json!({"a": [1]}));
        let child = root
            .child("a".to_string(), false)
            .child("0".to_string(), true);
        assert_eq!(child.location(), "$/a/0");
        assert_eq!(root.location(), "$");
    }
}
