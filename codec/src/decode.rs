//! Tagged to native decoding.

use serde_json::{Map, Value};
use store::StoreHandle;
use tracing::warn;
use value::{Fields, GeoPoint, NativeValue, TaggedDocument, TaggedValue, TypeTag, UnknownTag};

use crate::diagnostic::{CodecOutput, Diagnostic, FieldPath};
use crate::error::{CodecError, CodecResult, MalformedReason};
use crate::format::{json_kind, parse_timestamp, LATITUDE_KEY, LONGITUDE_KEY};
use crate::limits::CodecLimits;
use crate::resolve::{resolve_with_limits, split_reference_path};

static NULL: Value = Value::Null;

/// What a decode is bound to.
///
/// References can only be rebuilt against a store: the same path means
/// different documents in different databases. Without a store, reference
/// fields are dropped with [`CodecError::MissingBinding`].
#[derive(Clone, Default)]
pub struct DecodeContext<'a> {
    pub store: Option<&'a dyn StoreHandle>,
    pub limits: CodecLimits,
}

impl<'a> DecodeContext<'a> {
    /// A context with no store; reference fields cannot be decoded.
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    /// A context binding references to `store`.
    #[must_use]
    pub fn bound(store: &'a dyn StoreHandle) -> Self {
        Self {
            store: Some(store),
            limits: CodecLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl std::fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeContext")
            .field("store", &self.store.map(StoreHandle::database))
            .field("limits", &self.limits)
            .finish()
    }
}

/// Decodes a tagged document back into native fields.
///
/// Dispatch is on each field's tag; values are never re-classified. Fields
/// that cannot be decoded are dropped and reported in the diagnostics.
pub fn decode_document(doc: &TaggedDocument, ctx: &DecodeContext<'_>) -> CodecOutput<Fields> {
    let mut decoder = Decoder::new(ctx);
    let mut fields = Fields::with_capacity(doc.len());
    for (key, tagged) in doc {
        let path = FieldPath::root().key(key);
        if let Some(value) = decoder.decode_or_report(&tagged.tag, &tagged.value, &path) {
            fields.insert(key.clone(), value);
        }
    }
    CodecOutput {
        value: fields,
        diagnostics: decoder.diagnostics,
    }
}

/// Decodes a single tagged value, failing if it or anything nested in it cannot be decoded.
pub fn decode_value(tagged: &TaggedValue, ctx: &DecodeContext<'_>) -> CodecResult<NativeValue> {
    let mut decoder = Decoder::new(ctx);
    let value = decoder.decode(&tagged.tag, &tagged.value, &FieldPath::root())?;
    match decoder.diagnostics.into_iter().next() {
        Some(diagnostic) => Err(diagnostic.error),
        None => Ok(value),
    }
}

struct Decoder<'c, 'a> {
    ctx: &'c DecodeContext<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'c, 'a> Decoder<'c, 'a> {
    const fn new(ctx: &'c DecodeContext<'a>) -> Self {
        Self {
            ctx,
            diagnostics: Vec::new(),
        }
    }

    fn decode_or_report(&mut self, tag: &str, value: &Value, path: &FieldPath) -> Option<NativeValue> {
        match self.decode(tag, value, path) {
            Ok(native) => Some(native),
            Err(error) => {
                self.report(path, error);
                None
            }
        }
    }

    fn report(&mut self, path: &FieldPath, error: CodecError) {
        warn!(field = %path, %error, "dropping value from restore");
        self.diagnostics.push(Diagnostic {
            field: path.clone(),
            error,
        });
    }

    fn decode(&mut self, tag: &str, value: &Value, path: &FieldPath) -> CodecResult<NativeValue> {
        let tag: TypeTag = tag
            .parse()
            .map_err(|UnknownTag(tag)| CodecError::UnknownTag { tag })?;
        match tag {
            TypeTag::String => value
                .as_str()
                .map(|s| NativeValue::String(s.to_string()))
                .ok_or_else(|| expected(tag, "string", value)),
            TypeTag::Number => decode_number(value),
            TypeTag::Boolean => value
                .as_bool()
                .map(NativeValue::Boolean)
                .ok_or_else(|| expected(tag, "boolean", value)),
            TypeTag::Null => {
                if value.is_null() {
                    Ok(NativeValue::Null)
                } else {
                    Err(expected(tag, "null", value))
                }
            }
            TypeTag::Timestamp => {
                let text = value.as_str().ok_or_else(|| expected(tag, "string", value))?;
                parse_timestamp(text)
                    .map(NativeValue::Timestamp)
                    .ok_or(CodecError::MalformedValue {
                        tag,
                        reason: MalformedReason::InvalidTimestamp,
                    })
            }
            TypeTag::GeoPoint => {
                let map = value.as_object().ok_or_else(|| expected(tag, "object", value))?;
                decode_geo_point(map)
            }
            TypeTag::Reference => {
                let text = value.as_str().ok_or_else(|| expected(tag, "string", value))?;
                resolve_with_limits(
                    self.ctx.store,
                    &split_reference_path(text),
                    &self.ctx.limits,
                )
                .map(NativeValue::Reference)
            }
            TypeTag::Array => {
                self.ctx.limits.check_depth(path)?;
                let items = value.as_array().ok_or_else(|| expected(tag, "array", value))?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    if let Some(native) = self.decode_entry(item, &path.index(index)) {
                        out.push(native);
                    }
                }
                Ok(NativeValue::Array(out))
            }
            TypeTag::Object => {
                self.ctx.limits.check_depth(path)?;
                let map = value.as_object().ok_or_else(|| expected(tag, "object", value))?;
                let mut fields = Fields::with_capacity(map.len());
                for (key, entry) in map {
                    if let Some(native) = self.decode_entry(entry, &path.key(key)) {
                        fields.insert(key.clone(), native);
                    }
                }
                Ok(NativeValue::Object(fields))
            }
        }
    }

    /// Decodes a nested `{ value, type }` entry of an array or object.
    fn decode_entry(&mut self, entry: &Value, path: &FieldPath) -> Option<NativeValue> {
        match tagged_parts(entry) {
            Some((tag, value)) => self.decode_or_report(tag, value, path),
            None => {
                self.report(
                    path,
                    CodecError::MalformedValue {
                        tag: TypeTag::Object,
                        reason: MalformedReason::NotTagged,
                    },
                );
                None
            }
        }
    }
}

fn tagged_parts(entry: &Value) -> Option<(&str, &Value)> {
    let map = entry.as_object()?;
    let tag = map.get("type")?.as_str()?;
    Some((tag, map.get("value").unwrap_or(&NULL)))
}

fn decode_number(value: &Value) -> CodecResult<NativeValue> {
    if !value.is_number() {
        return Err(expected(TypeTag::Number, "number", value));
    }
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .map(NativeValue::Number)
        .ok_or(CodecError::MalformedValue {
            tag: TypeTag::Number,
            reason: MalformedReason::NumberOutOfRange,
        })
}

fn decode_geo_point(map: &Map<String, Value>) -> CodecResult<NativeValue> {
    let coordinate = |name: &'static str| {
        map.get(name)
            .and_then(Value::as_f64)
            .ok_or(CodecError::MalformedValue {
                tag: TypeTag::GeoPoint,
                reason: MalformedReason::MissingCoordinate { name },
            })
    };
    let latitude = coordinate(LATITUDE_KEY)?;
    let longitude = coordinate(LONGITUDE_KEY)?;
    GeoPoint::new(latitude, longitude)
        .map(NativeValue::GeoPoint)
        .map_err(|err| {
            let name = match err {
                value::ValueError::InvalidLatitude { .. } => LATITUDE_KEY,
                _ => LONGITUDE_KEY,
            };
            CodecError::MalformedValue {
                tag: TypeTag::GeoPoint,
                reason: MalformedReason::CoordinateOutOfRange { name },
            }
        })
}

fn expected(tag: TypeTag, expected: &'static str, found: &Value) -> CodecError {
    CodecError::MalformedValue {
        tag,
        reason: MalformedReason::ExpectedJson {
            expected,
            found: json_kind(found),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use store::MemoryStore;
    use value::DatabaseId;

    fn doc(value: Value) -> TaggedDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn scalars() {
        let out = decode_document(
            &doc(json!({
                "name": { "value": "Jhon", "type": "string" },
                "age": { "value": 21, "type": "number" },
                "price": { "value": 321.16, "type": "number" },
                "active": { "value": true, "type": "boolean" },
                "nothing": { "value": null, "type": "null" },
            })),
            &DecodeContext::unbound(),
        );
        assert!(out.is_clean());
        let fields = out.value;
        assert_eq!(fields["name"], NativeValue::from("Jhon"));
        assert_eq!(fields["age"], NativeValue::Number(21.0));
        assert_eq!(fields["price"], NativeValue::Number(321.16));
        assert_eq!(fields["active"], NativeValue::Boolean(true));
        assert_eq!(fields["nothing"], NativeValue::Null);
    }

    #[test]
    fn timestamp_and_geopoint() {
        let out = decode_document(
            &doc(json!({
                "at": { "value": "2018-05-11T00:53:20.123Z", "type": "timestamp" },
                "where": { "value": { "latitude": -32.8417, "longitude": -64.3 }, "type": "geopoint" },
            })),
            &DecodeContext::unbound(),
        );
        assert!(out.is_clean());
        assert_eq!(
            out.value["at"],
            NativeValue::Timestamp(Utc.timestamp_millis_opt(1_526_000_000_123).unwrap())
        );
        assert_eq!(
            out.value["where"],
            NativeValue::GeoPoint(GeoPoint::new(-32.8417, -64.3).unwrap())
        );
    }

    #[test]
    fn reference_without_store_is_missing_binding() {
        let out = decode_document(
            &doc(json!({
                "ref": { "value": "Col/Doc", "type": "reference" },
                "name": { "value": "kept", "type": "string" },
            })),
            &DecodeContext::unbound(),
        );
        assert!(!out.value.contains_key("ref"));
        assert!(out.value.contains_key("name"));
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(
            out.diagnostics[0].error,
            CodecError::MissingBinding {
                path: "Col/Doc".into()
            }
        );
    }

    #[test]
    fn reference_with_store_is_bound() {
        let store = MemoryStore::new(DatabaseId::default_for("target"));
        let out = decode_document(
            &doc(json!({ "ref": { "value": "Col/Doc", "type": "reference" } })),
            &DecodeContext::bound(&store),
        );
        assert!(out.is_clean());
        let reference = out.value["ref"].as_reference().unwrap();
        assert_eq!(reference.path.segments(), ["Col", "Doc"]);
        assert_eq!(reference.database, DatabaseId::default_for("target"));
    }

    #[test]
    fn reference_to_collection_rejected() {
        let store = MemoryStore::new(DatabaseId::default_for("target"));
        let out = decode_document(
            &doc(json!({ "ref": { "value": "Col", "type": "reference" } })),
            &DecodeContext::bound(&store),
        );
        assert!(out.value.is_empty());
        assert!(matches!(
            out.diagnostics[0].error,
            CodecError::InvalidReferencePath { .. }
        ));
    }

    #[test]
    fn unknown_tag_dropped_siblings_kept() {
        let out = decode_document(
            &doc(json!({
                "legacy": { "value": { "_referencePath": { "segments": ["a", "b"] } }, "type": "documentReference" },
                "ok": { "value": 1, "type": "number" },
            })),
            &DecodeContext::unbound(),
        );
        assert_eq!(out.value.len(), 1);
        assert_eq!(
            out.diagnostics[0].error,
            CodecError::UnknownTag {
                tag: "documentReference".into()
            }
        );
    }

    #[test]
    fn mismatched_payload_is_malformed() {
        let out = decode_document(
            &doc(json!({
                "n": { "value": "21", "type": "number" },
                "t": { "value": "not a date", "type": "timestamp" },
                "g": { "value": { "_latitude": 1.0, "_longitude": 2.0 }, "type": "geopoint" },
                "h": { "value": { "latitude": 91.0, "longitude": 2.0 }, "type": "geopoint" },
                "z": { "value": 0, "type": "null" },
            })),
            &DecodeContext::unbound(),
        );
        assert!(out.value.is_empty());
        let reasons: Vec<MalformedReason> = out
            .diagnostics
            .iter()
            .map(|d| match d.error {
                CodecError::MalformedValue { reason, .. } => reason,
                ref other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(
            reasons,
            [
                MalformedReason::ExpectedJson {
                    expected: "number",
                    found: "string"
                },
                MalformedReason::InvalidTimestamp,
                MalformedReason::MissingCoordinate { name: "latitude" },
                MalformedReason::CoordinateOutOfRange { name: "latitude" },
                MalformedReason::ExpectedJson {
                    expected: "null",
                    found: "number"
                },
            ]
        );
    }

    #[test]
    fn nested_array_and_object() {
        let out = decode_document(
            &doc(json!({
                "user": {
                    "value": {
                        "name": { "value": "Jhon", "type": "string" },
                        "friends": {
                            "value": [
                                { "value": "Laura", "type": "string" },
                                { "value": "Diego", "type": "string" },
                            ],
                            "type": "array"
                        }
                    },
                    "type": "object"
                },
                "empty": { "value": [], "type": "array" },
            })),
            &DecodeContext::unbound(),
        );
        assert!(out.is_clean());
        let user = out.value["user"].as_object().unwrap();
        assert_eq!(user["friends"], NativeValue::from(vec!["Laura", "Diego"]));
        assert_eq!(out.value["empty"], NativeValue::Array(Vec::new()));
    }

    #[test]
    fn nested_failure_drops_only_the_element() {
        let out = decode_document(
            &doc(json!({
                "list": {
                    "value": [
                        { "value": 1, "type": "number" },
                        { "value": "Col/Doc", "type": "reference" },
                        "bare string",
                        { "value": 3, "type": "number" },
                    ],
                    "type": "array"
                }
            })),
            &DecodeContext::unbound(),
        );
        assert_eq!(
            out.value["list"],
            NativeValue::Array(vec![1.into(), 3.into()])
        );
        let fields: Vec<String> = out
            .diagnostics
            .iter()
            .map(|d| d.field.to_string())
            .collect();
        assert_eq!(fields, ["list[1]", "list[2]"]);
    }

    #[test]
    fn depth_limit_applies() {
        let mut value = json!({ "value": 1, "type": "number" });
        for _ in 0..10 {
            value = json!({ "value": [value], "type": "array" });
        }
        let tagged: TaggedDocument = doc(json!({ "deep": value }));
        let ctx = DecodeContext::unbound().with_limits(CodecLimits::for_testing());
        let out = decode_document(&tagged, &ctx);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(
            out.diagnostics[0].error,
            CodecError::DepthExceeded { limit: 8 }
        );
    }

    #[test]
    fn decode_value_is_strict() {
        let tagged = TaggedValue::new(TypeTag::Array, json!([{ "value": "x", "type": "bogus" }]));
        let err = decode_value(&tagged, &DecodeContext::unbound()).unwrap_err();
        assert_eq!(err, CodecError::UnknownTag { tag: "bogus".into() });
    }
}
