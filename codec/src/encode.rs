//! Native to tagged encoding.

use serde_json::Value;
use tracing::warn;
use value::{Fields, NativeValue, TaggedDocument, TaggedValue};

use crate::classify::classify;
use crate::diagnostic::{CodecOutput, Diagnostic, FieldPath};
use crate::error::{CodecError, CodecResult};
use crate::format::{format_timestamp, geo_point_to_json, number_to_json};
use crate::limits::CodecLimits;

/// Encodes a document's fields into their tagged form.
///
/// Fields that cannot be backed up are dropped and reported in the returned
/// diagnostics; the rest of the document is still encoded. `Undefined`
/// fields are absent and produce no diagnostic.
pub fn encode_document(fields: &Fields) -> CodecOutput<TaggedDocument> {
    encode_document_with_limits(fields, &CodecLimits::default())
}

/// Encodes a document's fields with explicit limits.
pub fn encode_document_with_limits(
    fields: &Fields,
    limits: &CodecLimits,
) -> CodecOutput<TaggedDocument> {
    let mut encoder = Encoder::new(limits);
    let value = encoder.encode_fields(fields, &FieldPath::root());
    CodecOutput {
        value,
        diagnostics: encoder.diagnostics,
    }
}

/// Encodes a single value, failing if it or anything nested in it cannot be encoded.
pub fn encode_value(value: &NativeValue) -> CodecResult<TaggedValue> {
    let limits = CodecLimits::default();
    let mut encoder = Encoder::new(&limits);
    let tagged = encoder.encode(value, &FieldPath::root())?;
    match encoder.diagnostics.into_iter().next() {
        Some(diagnostic) => Err(diagnostic.error),
        None => Ok(tagged),
    }
}

struct Encoder<'a> {
    limits: &'a CodecLimits,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Encoder<'a> {
    const fn new(limits: &'a CodecLimits) -> Self {
        Self {
            limits,
            diagnostics: Vec::new(),
        }
    }

    fn encode_fields(&mut self, fields: &Fields, path: &FieldPath) -> TaggedDocument {
        let mut out = TaggedDocument::with_capacity(fields.len());
        for (key, value) in fields {
            if value.is_undefined() {
                continue;
            }
            let field = path.key(key);
            if let Some(tagged) = self.encode_or_report(value, &field) {
                out.insert(key.clone(), tagged);
            }
        }
        out
    }

    fn encode_or_report(&mut self, value: &NativeValue, path: &FieldPath) -> Option<TaggedValue> {
        match self.encode(value, path) {
            Ok(tagged) => Some(tagged),
            Err(error) => {
                warn!(field = %path, %error, "dropping value from backup");
                self.diagnostics.push(Diagnostic {
                    field: path.clone(),
                    error,
                });
                None
            }
        }
    }

    fn encode(&mut self, value: &NativeValue, path: &FieldPath) -> CodecResult<TaggedValue> {
        let tag = classify(value)?;
        let payload = match value {
            NativeValue::String(s) => Value::String(s.clone()),
            NativeValue::Number(n) => number_to_json(*n)?,
            NativeValue::Boolean(b) => Value::Bool(*b),
            NativeValue::Null => Value::Null,
            NativeValue::Timestamp(ts) => Value::String(format_timestamp(ts)),
            NativeValue::GeoPoint(point) => geo_point_to_json(point)?,
            NativeValue::Reference(reference) => {
                let joined = reference.path.to_string();
                self.limits
                    .check_reference_segments(&joined, reference.path.segments().len())?;
                Value::String(joined)
            }
            NativeValue::Array(items) => {
                self.limits.check_depth(path)?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    if let Some(tagged) = self.encode_or_report(item, &path.index(index)) {
                        out.push(Value::from(tagged));
                    }
                }
                Value::Array(out)
            }
            NativeValue::Object(fields) => {
                self.limits.check_depth(path)?;
                let nested = self.encode_fields(fields, path);
                Value::Object(
                    nested
                        .into_iter()
                        .map(|(key, tagged)| (key, Value::from(tagged)))
                        .collect(),
                )
            }
            NativeValue::Bytes(_) | NativeValue::Undefined => {
                return Err(CodecError::UnsupportedType { kind: value.kind() });
            }
        };
        Ok(TaggedValue::new(tag, payload))
    }
}
