//! Self-describing `{ value, type }` pairs persisted in backups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tag::{TypeTag, UnknownTag};

/// A tagged document: field name to tagged value, in field order.
///
/// This is the exact JSON shape of one backup file.
pub type TaggedDocument = IndexMap<String, TaggedValue>;

/// A JSON value paired with the tag needed to rebuild its native type.
///
/// The tag is kept as written so that files carrying tags this version does
/// not know still deserialize; the decoder reports them per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedValue {
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type")]
    pub tag: String,
}

impl TaggedValue {
    #[must_use]
    pub fn new(tag: TypeTag, value: Value) -> Self {
        Self {
            value,
            tag: tag.as_str().to_string(),
        }
    }

    /// Parses the tag name.
    pub fn tag(&self) -> Result<TypeTag, UnknownTag> {
        self.tag.parse()
    }
}

impl From<TaggedValue> for Value {
    /// Builds the `{ "value": .., "type": .. }` object nested inside arrays and objects.
    fn from(tagged: TaggedValue) -> Self {
        let mut map = Map::with_capacity(2);
        map.insert("value".to_string(), tagged.value);
        map.insert("type".to_string(), Self::String(tagged.tag));
        Self::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_value_then_type() {
        let tagged = TaggedValue::new(TypeTag::String, json!("Jhon"));
        let text = serde_json::to_string(&tagged).unwrap();
        assert_eq!(text, r#"{"value":"Jhon","type":"string"}"#);
    }

    #[test]
    fn into_json_matches_serialized_form() {
        let tagged = TaggedValue::new(TypeTag::Number, json!(3));
        let expected = serde_json::to_value(&tagged).unwrap();
        assert_eq!(Value::from(tagged), expected);
    }

    #[test]
    fn document_keeps_field_order() {
        let text = r#"{"zeta":{"value":1,"type":"number"},"alpha":{"value":null,"type":"null"}}"#;
        let doc: TaggedDocument = serde_json::from_str(text).unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&doc).unwrap(), text);
    }

    #[test]
    fn unknown_tag_survives_deserialization() {
        let text = r#"{"value":{"segments":["a","b"]},"type":"documentReference"}"#;
        let tagged: TaggedValue = serde_json::from_str(text).unwrap();
        assert!(tagged.tag().is_err());
        assert_eq!(tagged.tag, "documentReference");
    }

    #[test]
    fn missing_value_defaults_to_null() {
        let tagged: TaggedValue = serde_json::from_str(r#"{"type":"null"}"#).unwrap();
        assert_eq!(tagged.value, Value::Null);
    }

    #[test]
    fn missing_type_is_rejected() {
        let result: Result<TaggedValue, _> = serde_json::from_str(r#"{"value":1}"#);
        assert!(result.is_err());
    }
}
