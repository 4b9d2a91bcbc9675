//! Native document values as held by the document store.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::database::DocumentRef;
use crate::geo::GeoPoint;

/// An instant with nanosecond precision.
pub type Timestamp = DateTime<Utc>;

/// The fields of a document or nested object, in insertion order.
pub type Fields = IndexMap<String, NativeValue>;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    String(String),
    /// Any finite IEEE-754 value; there is no int/float split.
    Number(f64),
    Boolean(bool),
    Null,
    Timestamp(Timestamp),
    GeoPoint(GeoPoint),
    Reference(DocumentRef),
    Object(Fields),
    Array(Vec<NativeValue>),
    /// Raw bytes. The store supports them, backups do not.
    Bytes(Vec<u8>),
    /// Field absent.
    Undefined,
}

impl NativeValue {
    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
            Self::Timestamp(_) => "timestamp",
            Self::GeoPoint(_) => "geopoint",
            Self::Reference(_) => "reference",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Bytes(_) => "bytes",
            Self::Undefined => "undefined",
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<&DocumentRef> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Timestamp> for NativeValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<GeoPoint> for NativeValue {
    fn from(value: GeoPoint) -> Self {
        Self::GeoPoint(value)
    }
}

impl From<DocumentRef> for NativeValue {
    fn from(value: DocumentRef) -> Self {
        Self::Reference(value)
    }
}

impl From<Fields> for NativeValue {
    fn from(value: Fields) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for NativeValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}
