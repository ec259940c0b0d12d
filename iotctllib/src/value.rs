//! Structured value helpers: nested path lookup and display stringification.
//!
//! Items handed to the table generator are converted once into a
//! `serde_json::Value`, which gives a small explicit value model (mapping,
//! sequence, scalar) to walk with dotted property paths.
//!
//! Path syntax:
//!
//! - `a.b.c` walks nested mappings
//! - `items[0]` or `items.0` indexes into a sequence
//! - `items[*].name` or `items.*.name` fans out over every element,
//!   producing one match per element that has the remaining path

use serde::Serialize;
use serde_json::Value;

use crate::error::IotctlError;
use crate::Result;

/// One step of a parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
}

/// Split a property path into segments.
fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for part in path.split('.') {
        let mut rest = part;

        // Leading key before any bracket, e.g. `items` in `items[0]`
        let key_end = rest.find('[').unwrap_or(rest.len());
        let key = &rest[..key_end];
        if !key.is_empty() {
            segments.push(match key {
                "*" => Segment::Wildcard,
                _ => Segment::Key(key.to_string()),
            });
        }
        rest = &rest[key_end..];

        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(close) = stripped.find(']') else {
                // Unbalanced bracket: treat the remainder as a plain key
                segments.push(Segment::Key(rest.to_string()));
                break;
            };
            let inner = &stripped[..close];
            segments.push(match inner {
                "*" => Segment::Wildcard,
                _ => match inner.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(inner.trim_matches(['"', '\'']).to_string()),
                },
            });
            rest = &stripped[close + 1..];
        }
    }

    segments
}

/// Collect every value found at `path` inside `data`.
///
/// Missing keys, out-of-range indexes and attempts to descend into scalars
/// contribute no match. A `null` sitting at the end of the path is a match.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![data];

    for segment in parse_path(path) {
        let mut next = Vec::new();
        for value in current {
            match (&segment, value) {
                (Segment::Key(key), Value::Object(map)) => {
                    if let Some(found) = map.get(key) {
                        next.push(found);
                    }
                }
                (Segment::Key(key), Value::Array(items)) => {
                    if let Some(found) = key.parse::<usize>().ok().and_then(|i| items.get(i)) {
                        next.push(found);
                    }
                }
                (Segment::Index(index), Value::Array(items)) => {
                    if let Some(found) = items.get(*index) {
                        next.push(found);
                    }
                }
                (Segment::Index(index), Value::Object(map)) => {
                    if let Some(found) = map.get(&index.to_string()) {
                        next.push(found);
                    }
                }
                (Segment::Wildcard, Value::Array(items)) => next.extend(items.iter()),
                (Segment::Wildcard, Value::Object(map)) => next.extend(map.values()),
                _ => {}
            }
        }
        current = next;
    }

    current
}

/// Structured form of an item, used for property lookups.
pub fn to_data<T: Serialize>(item: &T) -> Result<Value> {
    serde_json::to_value(item).map_err(IotctlError::Serialize)
}

/// Convert a structured value to its display string.
///
/// Strings pass through untouched, `null` becomes empty, numbers and booleans
/// use their natural form and sequences or mappings are rendered as compact JSON.
pub fn string_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Kitchen",
            "address": { "city": "Springfield", "zip": null },
            "tags": ["a", "b", "c"],
            "functions": [
                { "arn": "arn:one" },
                { "arn": "arn:two" },
                { "other": true }
            ]
        })
    }

    #[test]
    fn test_parse_path_mixed() {
        assert_eq!(
            parse_path("a.b[2].c[*]"),
            vec![
                Segment::Key("a".to_string()),
                Segment::Key("b".to_string()),
                Segment::Index(2),
                Segment::Key("c".to_string()),
                Segment::Wildcard,
            ]
        );
    }

    #[test]
    fn test_lookup_top_level() {
        let data = sample();
        assert_eq!(lookup(&data, "name"), vec![&json!("Kitchen")]);
    }

    #[test]
    fn test_lookup_nested() {
        let data = sample();
        assert_eq!(lookup(&data, "address.city"), vec![&json!("Springfield")]);
    }

    #[test]
    fn test_lookup_missing_is_empty() {
        let data = sample();
        assert!(lookup(&data, "address.street").is_empty());
        assert!(lookup(&data, "nope.deeper").is_empty());
        // Descending into a scalar finds nothing
        assert!(lookup(&data, "name.first").is_empty());
    }

    #[test]
    fn test_lookup_null_leaf_is_a_match() {
        let data = sample();
        assert_eq!(lookup(&data, "address.zip"), vec![&Value::Null]);
    }

    #[test]
    fn test_lookup_indexes() {
        let data = sample();
        assert_eq!(lookup(&data, "tags[1]"), vec![&json!("b")]);
        assert_eq!(lookup(&data, "tags.2"), vec![&json!("c")]);
        assert!(lookup(&data, "tags[9]").is_empty());
    }

    #[test]
    fn test_lookup_wildcard_collects_matches() {
        let data = sample();
        let matches = lookup(&data, "functions[*].arn");
        assert_eq!(matches, vec![&json!("arn:one"), &json!("arn:two")]);

        let dotted = lookup(&data, "functions.*.arn");
        assert_eq!(dotted.len(), 2);
    }

    #[test]
    fn test_string_from_value() {
        assert_eq!(string_from_value(&json!("text")), "text");
        assert_eq!(string_from_value(&Value::Null), "");
        assert_eq!(string_from_value(&json!(false)), "false");
        assert_eq!(string_from_value(&json!(42)), "42");
        assert_eq!(string_from_value(&json!(1.5)), "1.5");
        assert_eq!(string_from_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(string_from_value(&json!([1, 2])), "[1,2]");
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_to_data() {
        assert_eq!(to_data(&("a", 1)).unwrap(), json!(["a", 1]));
        let err = to_data(&Unserializable).unwrap_err();
        assert!(matches!(err, IotctlError::Serialize(_)));
    }

    #[test]
    fn test_string_from_value_is_stable() {
        let value = json!({"nested": {"list": [1, "two", null]}});
        assert_eq!(string_from_value(&value), string_from_value(&value));
    }
}
