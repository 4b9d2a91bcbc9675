//! Collection and document paths.
//!
//! A path is an ordered list of segments alternating collection id and
//! document id. Collection paths have an odd segment count, document paths an
//! even one, so a document path can never name a bare collection.

use std::fmt;

use crate::error::{PathKind, ValueError, ValueResult};

/// Path separator used by the slash-joined form.
pub const SEPARATOR: char = '/';

/// Path to a collection, e.g. `users` or `users/alice/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Path to a document, e.g. `users/alice`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Creates a top-level collection path.
    pub fn root(id: &str) -> ValueResult<Self> {
        Self::from_segments(vec![id.to_string()])
    }

    /// Creates a collection path from segments, validating parity.
    pub fn from_segments(segments: Vec<String>) -> ValueResult<Self> {
        validate_segments(&segments, PathKind::Collection)?;
        Ok(Self { segments })
    }

    /// Parses a slash-joined collection path.
    pub fn parse(path: &str) -> ValueResult<Self> {
        Self::from_segments(split(path))
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the collection id (last segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns the document containing this collection, if any.
    #[must_use]
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 3 {
            return None;
        }
        Some(DocumentPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Returns the path of a document inside this collection.
    pub fn doc(&self, id: &str) -> ValueResult<DocumentPath> {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        DocumentPath::from_segments(segments)
    }
}

impl DocumentPath {
    /// Creates a document path from segments, validating parity.
    pub fn from_segments(segments: Vec<String>) -> ValueResult<Self> {
        validate_segments(&segments, PathKind::Document)?;
        Ok(Self { segments })
    }

    /// Parses a slash-joined document path.
    pub fn parse(path: &str) -> ValueResult<Self> {
        Self::from_segments(split(path))
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the document id (last segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns the collection containing this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    /// Returns the path of a subcollection of this document.
    pub fn collection(&self, id: &str) -> ValueResult<CollectionPath> {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        CollectionPath::from_segments(segments)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

fn split(path: &str) -> Vec<String> {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(SEPARATOR).map(str::to_string).collect()
}

fn validate_segments(segments: &[String], kind: PathKind) -> ValueResult<()> {
    if segments.is_empty() {
        return Err(ValueError::EmptyPath);
    }
    let parity_ok = match kind {
        PathKind::Collection => segments.len() % 2 == 1,
        PathKind::Document => segments.len() % 2 == 0,
    };
    if !parity_ok {
        return Err(ValueError::SegmentParity {
            kind,
            segments: segments.len(),
        });
    }
    for (index, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            return Err(ValueError::EmptySegment { index });
        }
        if segment.contains(SEPARATOR) {
            return Err(ValueError::SegmentContainsSlash { index });
        }
        if segment == "." || segment == ".." {
            return Err(ValueError::ReservedSegment { index });
        }
    }
    Ok(())
}
