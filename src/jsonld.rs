//! Accessors over expanded JSON-LD node objects.
//!
//! In expanded form every property key is a full IRI and every property value
//! is an array of value nodes: `{"@id": IRI}` for references and
//! `{"@value": literal}` for literals. These helpers read that shape without
//! any further JSON-LD processing.

use serde_json::Value;

use crate::error::HydraError;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// All values of `property` on `node`, in document order.
///
/// A non-array value is treated as a one-element list so that partially
/// expanded input still reads sensibly. Missing properties yield an empty slice.
pub fn values<'a>(node: &'a Value, property: &str) -> &'a [Value] {
    match node.get(property) {
        Some(Value::Array(arr)) => arr,
        Some(other) => std::slice::from_ref(other),
        None => &[],
    }
}

/// First value of `property`, or `None` when absent or empty.
///
/// Callers wanting a default use `unwrap_or`.
pub fn first_value<'a>(node: &'a Value, property: &str) -> Option<&'a Value> {
    values(node, property).first()
}

/// First value of `property` with its `@value` payload unwrapped.
///
/// A value node without `@value` (a reference, an embedded node) is returned
/// unchanged.
pub fn literal_value<'a>(node: &'a Value, property: &str) -> Option<&'a Value> {
    first_value(node, property).map(|val| val.get("@value").unwrap_or(val))
}

/// The single `@id` of a reference, unwrapping a one-element array first.
///
/// # Errors
///
/// Returns `HydraError::MalformedReference` unless exactly one `@id` value
/// is present.
pub fn id_of(value: &Value) -> Result<&str, HydraError> {
    let node = match value {
        Value::Array(arr) if arr.len() == 1 => &arr[0],
        Value::Array(arr) => return Err(HydraError::MalformedReference { found: arr.len() }),
        other => other,
    };

    match node.get("@id") {
        Some(Value::String(id)) => Ok(id),
        Some(Value::Array(ids)) if ids.len() == 1 => ids[0]
            .as_str()
            .ok_or(HydraError::MalformedReference { found: 0 }),
        Some(Value::Array(ids)) => Err(HydraError::MalformedReference { found: ids.len() }),
        _ => Err(HydraError::MalformedReference { found: 0 }),
    }
}

/// Whether a value node is a reference (`{"@id": ...}`).
pub fn has_id(value: &Value) -> bool {
    value.get("@id").is_some()
}

/// Whether a value node carries a literal (`{"@value": ...}`).
pub fn has_literal_value(value: &Value) -> bool {
    value.get("@value").is_some()
}

/// Unwrap a one-element array; any other value is returned as-is.
pub fn unwrap_singleton(value: &Value) -> &Value {
    match value {
        Value::Array(arr) if arr.len() == 1 => &arr[0],
        other => other,
    }
}

/// The `@id` of a node when it is a plain string.
pub fn node_id(node: &Value) -> Option<&str> {
    node.get("@id").and_then(Value::as_str)
}

/// The `@type` list of a node, as IRIs.
pub fn types_of(node: &Value) -> Vec<&str> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Render a value node as a string: literal payload, reference IRI, or bare scalar.
pub fn string_value(value: &Value) -> Option<String> {
    let inner = value.get("@value").or_else(|| value.get("@id")).unwrap_or(value);
    match inner {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First value of `property` rendered with [`string_value`].
pub fn first_string(node: &Value, property: &str) -> Option<String> {
    first_value(node, property).and_then(string_value)
}

/// First value of `property` when it is a boolean literal.
pub fn bool_value(node: &Value, property: &str) -> Option<bool> {
    literal_value(node, property).and_then(Value::as_bool)
}

/// IRIs of all reference values of `property`.
pub fn ids_of(node: &Value, property: &str) -> Vec<String> {
    values(node, property)
        .iter()
        .filter_map(|v| node_id(v).map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NAME: &str = "http://schema.org/name";

    #[test]
    fn first_value_absent_and_empty() {
        let node = json!({ NAME: [] });
        assert!(first_value(&node, NAME).is_none());
        assert!(first_value(&node, "http://schema.org/other").is_none());

        let fallback = json!("n/a");
        assert_eq!(
            first_value(&node, NAME).unwrap_or(&fallback),
            &json!("n/a")
        );
    }

    #[test]
    fn literal_value_unwraps_value_nodes_only() {
        let node = json!({
            NAME: [{ "@value": "Ada" }, { "@value": "Lovelace" }],
            "http://schema.org/knows": [{ "@id": "http://example.com/babbage" }]
        });
        assert_eq!(literal_value(&node, NAME), Some(&json!("Ada")));
        assert_eq!(
            literal_value(&node, "http://schema.org/knows"),
            Some(&json!({ "@id": "http://example.com/babbage" }))
        );
    }

    #[test]
    fn id_of_single_reference() {
        assert_eq!(id_of(&json!([{ "@id": "x" }])).unwrap(), "x");
        assert_eq!(id_of(&json!({ "@id": "x" })).unwrap(), "x");
    }

    #[test]
    fn id_of_rejects_multiple_references() {
        let value = json!([{ "@id": "x" }, { "@id": "y" }]);
        let result = id_of(&value);
        assert!(matches!(
            result,
            Err(HydraError::MalformedReference { found: 2 })
        ));
    }

    #[test]
    fn id_of_rejects_literals_and_empty() {
        assert!(matches!(
            id_of(&json!([{ "@value": "x" }])),
            Err(HydraError::MalformedReference { found: 0 })
        ));
        assert!(matches!(
            id_of(&json!([])),
            Err(HydraError::MalformedReference { found: 0 })
        ));
    }

    #[test]
    fn predicates() {
        assert!(has_id(&json!({ "@id": "x" })));
        assert!(!has_id(&json!({ "@value": "x" })));
        assert!(has_literal_value(&json!({ "@value": 3 })));
        assert_eq!(unwrap_singleton(&json!([1])), &json!(1));
        assert_eq!(unwrap_singleton(&json!([1, 2])), &json!([1, 2]));
    }

    #[test]
    fn types_accepts_string_or_array() {
        assert_eq!(types_of(&json!({ "@type": "A" })), vec!["A"]);
        assert_eq!(types_of(&json!({ "@type": ["A", "B"] })), vec!["A", "B"]);
        assert!(types_of(&json!({})).is_empty());
    }

    #[test]
    fn string_value_variants() {
        assert_eq!(string_value(&json!({ "@value": 42 })), Some("42".into()));
        assert_eq!(string_value(&json!({ "@id": "x" })), Some("x".into()));
        assert_eq!(string_value(&json!("plain")), Some("plain".into()));
        assert_eq!(string_value(&json!({ "a": 1 })), None);
    }
}
