//! Error types for codec operations.
//!
//! Every codec error is scoped to one field or array element. The document
//! level entry points collect them as [`crate::Diagnostic`]s instead of
//! returning them.

use std::fmt;

use value::{PathKind, TypeTag, ValueError};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The native value has no tag in the backup format.
    UnsupportedType { kind: &'static str },

    /// NaN or an infinity, which JSON cannot carry.
    NonFiniteNumber { kind: NonFiniteKind },

    /// A timestamp outside years 1..=9999, which RFC 3339 cannot carry.
    TimestampOutOfRange { year: i32 },

    /// A reference was decoded without a store to bind it to.
    MissingBinding { path: String },

    /// The store refused to address a reference path.
    BindingFailed { path: String, reason: String },

    /// A reference path cannot name a document.
    InvalidReferencePath { path: String, reason: PathReason },

    /// The tag is not one this version writes.
    UnknownTag { tag: String },

    /// The payload does not have the shape its tag promises.
    MalformedValue {
        tag: TypeTag,
        reason: MalformedReason,
    },

    /// Objects/arrays nested deeper than the configured limit.
    DepthExceeded { limit: usize },
}

/// Which non-finite value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFiniteKind {
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

impl NonFiniteKind {
    /// Classifies a non-finite `f64`. Returns `None` for finite values.
    #[must_use]
    pub fn of(value: f64) -> Option<Self> {
        if value.is_nan() {
            Some(Self::NaN)
        } else if value == f64::INFINITY {
            Some(Self::PositiveInfinity)
        } else if value == f64::NEG_INFINITY {
            Some(Self::NegativeInfinity)
        } else {
            None
        }
    }
}

/// Details for invalid reference paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathReason {
    Empty,
    OddSegmentCount { segments: usize },
    EmptySegment { index: usize },
    SegmentContainsSlash { index: usize },
    ReservedSegment { index: usize },
    TooManySegments { segments: usize, limit: usize },
}

/// Details for payloads that do not match their tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// JSON type of the payload is wrong for the tag.
    ExpectedJson { expected: &'static str, found: &'static str },
    /// Timestamp string is not RFC 3339.
    InvalidTimestamp,
    /// Geo point lacks `latitude` or `longitude`.
    MissingCoordinate { name: &'static str },
    /// Geo point coordinate is out of range.
    CoordinateOutOfRange { name: &'static str },
    /// Number does not fit in an `f64`.
    NumberOutOfRange,
    /// An array element or object field is not a `{ value, type }` pair.
    NotTagged,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { kind } => {
                write!(f, "unsupported value type '{kind}'")
            }
            Self::NonFiniteNumber { kind } => {
                write!(f, "non-finite number {kind} cannot be backed up")
            }
            Self::TimestampOutOfRange { year } => {
                write!(f, "timestamp year {year} outside 1..=9999")
            }
            Self::MissingBinding { path } => {
                write!(f, "reference '{path}' needs a store to bind to")
            }
            Self::BindingFailed { path, reason } => {
                write!(f, "cannot bind reference '{path}': {reason}")
            }
            Self::InvalidReferencePath { path, reason } => {
                write!(f, "invalid reference path '{path}': {reason}")
            }
            Self::UnknownTag { tag } => write!(f, "unknown type tag '{tag}'"),
            Self::MalformedValue { tag, reason } => {
                write!(f, "malformed {tag} value: {reason}")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "nesting depth exceeds {limit}")
            }
        }
    }
}

impl fmt::Display for NonFiniteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NaN => "NaN",
            Self::PositiveInfinity => "Infinity",
            Self::NegativeInfinity => "-Infinity",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for PathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no segments"),
            Self::OddSegmentCount { segments } => {
                write!(f, "{segments} segments name a collection, not a document")
            }
            Self::EmptySegment { index } => write!(f, "segment {index} is empty"),
            Self::SegmentContainsSlash { index } => write!(f, "segment {index} contains '/'"),
            Self::ReservedSegment { index } => write!(f, "segment {index} is '.' or '..'"),
            Self::TooManySegments { segments, limit } => {
                write!(f, "{segments} segments exceed limit {limit}")
            }
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedJson { expected, found } => {
                write!(f, "expected JSON {expected} but got {found}")
            }
            Self::InvalidTimestamp => write!(f, "not an RFC 3339 timestamp"),
            Self::MissingCoordinate { name } => write!(f, "missing {name}"),
            Self::CoordinateOutOfRange { name } => write!(f, "{name} out of range"),
            Self::NumberOutOfRange => write!(f, "number does not fit in f64"),
            Self::NotTagged => write!(f, "nested entry is not a tagged value"),
        }
    }
}

impl std::error::Error for CodecError {}

impl PathReason {
    /// Maps a path validation error onto a reference path reason.
    pub(crate) fn from_value_error(err: &ValueError) -> Self {
        match err {
            ValueError::SegmentParity {
                kind: PathKind::Document,
                segments,
            } => Self::OddSegmentCount {
                segments: *segments,
            },
            ValueError::EmptySegment { index } => Self::EmptySegment { index: *index },
            ValueError::SegmentContainsSlash { index } => {
                Self::SegmentContainsSlash { index: *index }
            }
            ValueError::ReservedSegment { index } => Self::ReservedSegment { index: *index },
            _ => Self::Empty,
        }
    }
}
