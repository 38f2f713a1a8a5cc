//! Deterministic ordering for JSON-LD output.
//!
//! The JSON-LD serializer emits node objects in hash order. Listings are
//! sorted by `@id` so repeated serializations of the same graph are
//! byte-identical; `@list` containers keep their order, which is
//! semantic.

use serde_json::Value;

/// Recursively sort arrays of node objects by their `@id`.
pub fn sort_by_id(value: Value) -> Value {
    sort_inner(value, None)
}

fn sort_inner(value: Value, parent_key: Option<&str>) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| {
                    let sorted = sort_inner(inner, Some(&key));
                    (key, sorted)
                })
                .collect(),
        ),
        Value::Array(items) => {
            let mut items: Vec<Value> = items
                .into_iter()
                .map(|item| sort_inner(item, parent_key))
                .collect();

            // @list ordering is meaningful, leave it alone
            if parent_key != Some("@list")
                && !items.is_empty()
                && items.iter().all(|item| item.get("@id").is_some())
            {
                items.sort_by(|a, b| {
                    let a_id = a.get("@id").and_then(Value::as_str).unwrap_or("");
                    let b_id = b.get("@id").and_then(Value::as_str).unwrap_or("");
                    a_id.cmp(b_id)
                });
            }

            Value::Array(items)
        }
        other => other,
    }
}

/// Parse, sort, and re-serialize a JSON-LD document.
pub fn sort_document(raw: &[u8]) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_slice(raw)?;
    serde_json::to_string_pretty(&sort_by_id(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_node_arrays_by_id() {
        let input = json!([
            {"@id": "http://example.org/b"},
            {"@id": "http://example.org/a"},
        ]);
        let sorted = sort_by_id(input);
        assert_eq!(
            sorted,
            json!([
                {"@id": "http://example.org/a"},
                {"@id": "http://example.org/b"},
            ])
        );
    }

    #[test]
    fn leaves_list_containers_alone() {
        let input = json!({
            "@list": [
                {"@id": "http://example.org/b"},
                {"@id": "http://example.org/a"},
            ]
        });
        assert_eq!(sort_by_id(input.clone()), input);
    }

    #[test]
    fn mixed_arrays_are_not_reordered() {
        let input = json!(["plain", {"@id": "x"}]);
        assert_eq!(sort_by_id(input.clone()), input);
    }

    #[test]
    fn sorts_nested_structures() {
        let input = json!({
            "@graph": [
                {"@id": "b", "values": [{"@id": "z"}, {"@id": "y"}]},
                {"@id": "a"},
            ]
        });
        let sorted = sort_by_id(input);
        assert_eq!(sorted["@graph"][0]["@id"], "a");
        assert_eq!(sorted["@graph"][1]["values"][0]["@id"], "y");
    }

    #[test]
    fn sorting_twice_is_stable() {
        let input = json!([{"@id": "b"}, {"@id": "a"}]);
        let once = sort_by_id(input);
        let twice = sort_by_id(once.clone());
        assert_eq!(once, twice);
    }
}
