//! Typed value codec for document store backups.
//!
//! Every field of a backed-up document is written as `{ "value", "type" }`
//! so that values JSON cannot tell apart (timestamps, geo points, document
//! references) survive the trip through a plain JSON file.
//!
//! # Features
//!
//! - Classification of native values into type tags
//! - Document encoding with per-field diagnostics
//! - Tag-driven decoding, never re-classifying payloads
//! - Reference resolution against a live store binding
//!
//! # Design Principles
//!
//! - **Partial success** - A bad field is dropped and reported; its siblings survive.
//! - **Bound references** - A reference is only rebuilt against the store it will live in.
//! - **Deterministic** - Field order and number formatting are stable across runs.

mod classify;
mod decode;
mod diagnostic;
mod encode;
mod error;
mod format;
mod limits;
mod resolve;

pub use classify::classify;
pub use decode::{decode_document, decode_value, DecodeContext};
pub use diagnostic::{CodecOutput, Diagnostic, FieldPath, FieldSegment};
pub use encode::{encode_document, encode_document_with_limits, encode_value};
pub use error::{CodecError, CodecResult, MalformedReason, NonFiniteKind, PathReason};
pub use format::{format_timestamp, parse_timestamp, LATITUDE_KEY, LONGITUDE_KEY};
pub use limits::CodecLimits;
pub use resolve::{resolve_reference, resolve_reference_path, split_reference_path};
