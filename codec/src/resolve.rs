//! Reference resolution against a live store.

use store::{StoreError, StoreHandle};
use value::{DocumentPath, DocumentRef, SEPARATOR};

use crate::error::{CodecError, CodecResult, PathReason};
use crate::limits::CodecLimits;

/// Resolves a reference path into a reference bound to `store`.
///
/// Segments alternate collection id and document id. The walk descends one
/// `collection(..).doc(..)` pair at a time, so every prefix is addressed
/// through the store exactly as a client would.
pub fn resolve_reference<S: AsRef<str>>(
    store: Option<&dyn StoreHandle>,
    segments: &[S],
) -> CodecResult<DocumentRef> {
    resolve_with_limits(store, segments, &CodecLimits::default())
}

/// Resolves a slash-joined reference path, as written in backup files.
pub fn resolve_reference_path(
    store: Option<&dyn StoreHandle>,
    path: &str,
) -> CodecResult<DocumentRef> {
    resolve_with_limits(store, &split_reference_path(path), &CodecLimits::default())
}

/// Splits a slash-joined reference path into segments.
#[must_use]
pub fn split_reference_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(SEPARATOR).collect()
}

pub(crate) fn resolve_with_limits<S: AsRef<str>>(
    store: Option<&dyn StoreHandle>,
    segments: &[S],
    limits: &CodecLimits,
) -> CodecResult<DocumentRef> {
    let joined = join(segments);
    let Some(store) = store else {
        return Err(CodecError::MissingBinding { path: joined });
    };
    let invalid = |reason: PathReason| CodecError::InvalidReferencePath {
        path: joined.clone(),
        reason,
    };

    if segments.is_empty() {
        return Err(invalid(PathReason::Empty));
    }
    if segments.len() % 2 != 0 {
        return Err(invalid(PathReason::OddSegmentCount {
            segments: segments.len(),
        }));
    }
    limits.check_reference_segments(&joined, segments.len())?;

    let mut document: Option<DocumentPath> = None;
    for pair in segments.chunks_exact(2) {
        let collection = store
            .collection(document.as_ref(), pair[0].as_ref())
            .map_err(|err| store_error(&joined, err))?;
        let next = collection
            .doc(pair[1].as_ref())
            .map_err(|err| invalid(PathReason::from_value_error(&err)))?;
        document = Some(next);
    }

    document
        .map(|path| store.document_ref(path))
        .ok_or_else(|| invalid(PathReason::Empty))
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<&str>>()
        .join("/")
}

fn store_error(path: &str, err: StoreError) -> CodecError {
    match err {
        StoreError::InvalidPath(err) => CodecError::InvalidReferencePath {
            path: path.to_string(),
            reason: PathReason::from_value_error(&err),
        },
        StoreError::Unavailable { reason } => CodecError::BindingFailed {
            path: path.to_string(),
            reason,
        },
    }
}
