//! Value construction errors.

use std::fmt;

/// Result type for value construction.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur when building paths, geo points or database ids.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Latitude outside [-90, 90] or not finite.
    InvalidLatitude { latitude: f64 },

    /// Longitude outside [-180, 180] or not finite.
    InvalidLongitude { longitude: f64 },

    /// Path has no segments.
    EmptyPath,

    /// Segment count does not match the path kind.
    SegmentParity { kind: PathKind, segments: usize },

    /// A segment is empty.
    EmptySegment { index: usize },

    /// A segment contains the `/` separator.
    SegmentContainsSlash { index: usize },

    /// A segment is `.` or `..`, which would escape its parent on disk.
    ReservedSegment { index: usize },

    /// Database name is not `projects/<project>/databases/<database>`.
    InvalidDatabaseName { name: String },
}

/// The kind of path being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Collection,
    Document,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLatitude { latitude } => {
                write!(f, "latitude {latitude} outside [-90, 90]")
            }
            Self::InvalidLongitude { longitude } => {
                write!(f, "longitude {longitude} outside [-180, 180]")
            }
            Self::EmptyPath => write!(f, "path has no segments"),
            Self::SegmentParity { kind, segments } => {
                write!(f, "{kind} path cannot have {segments} segments")
            }
            Self::EmptySegment { index } => write!(f, "segment {index} is empty"),
            Self::SegmentContainsSlash { index } => {
                write!(f, "segment {index} contains '/'")
            }
            Self::ReservedSegment { index } => {
                write!(f, "segment {index} is a reserved id")
            }
            Self::InvalidDatabaseName { name } => {
                write!(f, "invalid database name '{name}'")
            }
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl std::error::Error for ValueError {}
