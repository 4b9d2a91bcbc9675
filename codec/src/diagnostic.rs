//! Field-scoped diagnostics collected while encoding or decoding a document.

use std::fmt;

use crate::error::CodecError;

/// One step into a document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a document, rendered as `user.friends[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<FieldSegment>,
}

impl FieldPath {
    /// The document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.child(FieldSegment::Key(key.to_string()))
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(FieldSegment::Index(index))
    }

    #[must_use]
    pub fn segments(&self) -> &[FieldSegment] {
        &self.segments
    }

    /// Number of object/array levels below the top-level field.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    fn child(&self, segment: FieldSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                FieldSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                FieldSegment::Key(key) => write!(f, ".{key}")?,
                FieldSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A value that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: FieldPath,
    pub error: CodecError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Result of a document-level encode or decode.
///
/// `value` holds every field that converted; `diagnostics` lists the ones
/// that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecOutput<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> CodecOutput<T> {
    /// Returns `true` if nothing was dropped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
