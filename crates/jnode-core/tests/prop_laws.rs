/// Property-based tests for the navigation laws.
///
/// Uses `proptest` to generate random JSON documents and paths into them, then
/// checks the laws every document must satisfy:
///
/// - decode/encode round trip is structurally equal
/// - selecting the empty path is the identity
/// - select → set → select reads back what was written
/// - deleting element `i` shifts element `i + 1` down
/// - a cursor over `n` elements advances exactly `n` times
///
/// Floats are generated as eighths so they survive the text round trip without
/// last-digit drift.
use jnode_core::JsonNode;
use proptest::prelude::*;
use serde_json::{Map, Number, Value};

// ============================================================================
// Strategies for generating JSON values
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,8}").unwrap()
}

fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000i64).prop_map(|n| Value::Number(Number::from(n))),
        (-100_000i32..100_000i32).prop_filter_map("finite float", |n| {
            Number::from_f64(f64::from(n) / 8.0).map(Value::Number)
        }),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_primitive().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Collect every path that resolves to a value in `value`, root included.
fn all_paths(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    out.push(prefix.clone());
    match value {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                prefix.push(idx.to_string());
                all_paths(item, prefix, out);
                prefix.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                prefix.push(key.clone());
                all_paths(item, prefix, out);
                prefix.pop();
            }
        }
        _ => {}
    }
}

/// A document together with one of its resolvable paths.
fn arb_json_with_path() -> impl Strategy<Value = (Value, Vec<String>)> {
    arb_json().prop_flat_map(|value| {
        let mut paths = Vec::new();
        all_paths(&value, &mut Vec::new(), &mut paths);
        let len = paths.len();
        (Just(value), Just(paths), 0..len)
            .prop_map(|(value, paths, idx)| (value, paths[idx].clone()))
    })
}

// ============================================================================
// Laws
// ============================================================================

proptest! {
    #[test]
    fn encode_decode_roundtrip(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let root = JsonNode::parse(&text);
        prop_assert!(!root.has_error());

        let reencoded = root.to_json_string().unwrap();
        let back: Value = serde_json::from_str(&reencoded).unwrap();
        prop_assert_eq!(back, root.value());
    }

    #[test]
    fn empty_select_is_identity(value in arb_json()) {
        let mut root = JsonNode::wrap(value.clone());
        let empty: [&str; 0] = [];
        let same = root.select(&empty);
        prop_assert!(same.is_root());
        prop_assert!(!same.has_error());
        prop_assert_eq!(same.value(), value);
    }

    #[test]
    fn select_reads_what_lookup_sees((value, path) in arb_json_with_path()) {
        let mut root = JsonNode::wrap(value);
        let expected = root.lookup(path.as_slice());
        let node = root.select(path.as_slice());
        prop_assert!(!node.has_error());
        prop_assert_eq!(Some(node.value()), expected);
    }

    #[test]
    fn write_then_read((value, path) in arb_json_with_path(), written in arb_json()) {
        let mut root = JsonNode::wrap(value);
        let mut node = root.select(path.as_slice());
        node.set(written.clone());
        prop_assert!(!node.has_error());

        let read: Value = root.select(path.as_slice()).decode_into().unwrap();
        prop_assert_eq!(read, written);
    }

    #[test]
    fn delete_shifts_later_elements(
        items in prop::collection::vec(arb_primitive(), 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let n = items.len();
        let i = pick.index(n);
        let mut root = JsonNode::wrap(Value::Array(items.clone()));

        root.select(&[i.to_string()]).delete();
        prop_assert!(!root.has_error());
        prop_assert_eq!(root.len(), n - 1);
        if i + 1 < n {
            prop_assert_eq!(root.lookup(&[i.to_string()]), Some(items[i + 1].clone()));
        }
    }

    #[test]
    fn cursor_advances_exactly_len_times(items in prop::collection::vec(arb_primitive(), 0..20)) {
        let mut root = JsonNode::wrap(Value::Array(items.clone()));
        let mut cursor = root.iter().unwrap();

        let mut advanced = 0;
        while cursor.advance() {
            prop_assert_eq!(cursor.current(), Some(items[advanced].clone()));
            advanced += 1;
        }
        prop_assert_eq!(advanced, items.len());
        prop_assert!(!cursor.advance());
    }

    #[test]
    fn exists_is_false_for_null_terminal(key in arb_key()) {
        let mut map = Map::new();
        map.insert(key.clone(), Value::Null);
        let mut root = JsonNode::wrap(Value::Object(map));
        prop_assert!(!root.exists(&[key.as_str()]));
        prop_assert!(!root.exists(&[key.as_str(), "deeper"]));
    }
}
