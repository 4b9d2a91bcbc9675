//! JSON rendering of backed-up documents.

use serde_json::{Map, Value};
use value::TaggedDocument;

/// How document files are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFormat {
    /// Indent with two spaces instead of writing compact JSON.
    pub pretty: bool,
    /// Sort object keys recursively so output does not depend on field order.
    pub stable: bool,
}

/// Renders a tagged document as the text of a backup file.
pub fn render_document(doc: &TaggedDocument, format: OutputFormat) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(doc)?;
    if format.stable {
        value = sort_keys(value);
    }
    let mut text = if format.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    text.push('\n');
    Ok(text)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> TaggedDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn compact_keeps_field_order() {
        let doc = doc(json!({
            "b": { "value": 1, "type": "number" },
            "a": { "value": true, "type": "boolean" },
        }));
        let text = render_document(&doc, OutputFormat::default()).unwrap();
        assert_eq!(
            text,
            "{\"b\":{\"value\":1,\"type\":\"number\"},\"a\":{\"value\":true,\"type\":\"boolean\"}}\n"
        );
    }

    #[test]
    fn pretty_uses_two_spaces() {
        let doc = doc(json!({ "a": { "value": null, "type": "null" } }));
        let format = OutputFormat {
            pretty: true,
            stable: false,
        };
        let text = render_document(&doc, format).unwrap();
        assert!(text.starts_with("{\n  \"a\": {\n    \"value\": null,"));
    }

    #[test]
    fn stable_output_ignores_insertion_order() {
        let first = doc(json!({
            "z": { "value": { "y": { "value": 1, "type": "number" }, "x": { "value": 2, "type": "number" } }, "type": "object" },
            "a": { "value": "s", "type": "string" },
        }));
        let second = doc(json!({
            "a": { "type": "string", "value": "s" },
            "z": { "value": { "x": { "value": 2, "type": "number" }, "y": { "value": 1, "type": "number" } }, "type": "object" },
        }));
        let format = OutputFormat {
            pretty: false,
            stable: true,
        };
        assert_eq!(
            render_document(&first, format).unwrap(),
            render_document(&second, format).unwrap()
        );
    }
}
