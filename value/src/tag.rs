//! Type tags written next to every backed-up value.

use std::fmt;
use std::str::FromStr;

/// The closed set of tags a tagged value may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Null,
    Timestamp,
    GeoPoint,
    Reference,
    Object,
    Array,
}

impl TypeTag {
    /// All tags, in wire-name order.
    pub const ALL: [Self; 9] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Null,
        Self::Timestamp,
        Self::GeoPoint,
        Self::Reference,
        Self::Object,
        Self::Array,
    ];

    /// Returns the on-disk name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Timestamp => "timestamp",
            Self::GeoPoint => "geopoint",
            Self::Reference => "reference",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tag name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for TypeTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}
