//! Correlation key lookup for the composite search.
//!
//! The group-search response has no fixed shape, so the course-group code is
//! found by walking the whole document. Order is depth-first pre-order:
//! object entries in document order, array elements in order. The first
//! entry whose key equals `kcptdm` (ignoring ASCII case) and whose value is
//! truthy wins. A matching but falsy entry is still descended into.

use serde_json::Value;

pub const KCPTDM: &str = "kcptdm";

/// Deepest level worth searching. serde_json refuses documents with more
/// than 127 nested containers, so entries of the innermost container sit at
/// depth 127 and nothing below it can ever be parsed.
pub const MAX_SEARCH_DEPTH: usize = 127;

/// Default nesting limit for [`find_kcptdm`].
pub const DEFAULT_MAX_DEPTH: usize = MAX_SEARCH_DEPTH;

/// Truthiness of a JSON value: empty strings, arrays and objects, zero,
/// `false` and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Find the first truthy `kcptdm` in `root`, visiting at most `max_depth`
/// levels below the root.
pub fn find_kcptdm(root: &Value, max_depth: usize) -> Option<String> {
    find_key(root, KCPTDM, max_depth).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn find_key<'a>(root: &'a Value, needle: &str, max_depth: usize) -> Option<&'a Value> {
    // (key under which the value sits, value, depth of the value)
    let mut stack: Vec<(Option<&'a str>, &'a Value, usize)> = vec![(None, root, 0)];

    while let Some((key, value, depth)) = stack.pop() {
        if let Some(key) = key {
            if key.eq_ignore_ascii_case(needle) && is_truthy(value) {
                return Some(value);
            }
        }

        if depth >= max_depth {
            continue;
        }

        // Children are pushed in reverse so they pop in document order.
        match value {
            Value::Object(map) => {
                for (k, v) in map.iter().rev() {
                    stack.push((Some(k.as_str()), v, depth + 1));
                }
            }
            Value::Array(items) => {
                for item in items.iter().rev() {
                    stack.push((None, item, depth + 1));
                }
            }
            _ => {}
        }
    }

    None
}
