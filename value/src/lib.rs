//! Native and tagged document value model for docvault.
//!
//! This crate defines the two value worlds the codec converts between:
//! - Native values as the document store holds them (timestamps, geo points,
//!   references, nested objects and arrays)
//! - Tagged values, the `{ value, type }` JSON pairs written to backup files
//! - Collection/document paths and database identity used by references
//!
//! # Design Principles
//!
//! - **Closed types** - Native values are a sum type; there is no runtime duck typing.
//! - **Validated paths** - A document path always names a document, never a collection.
//! - **Order preserving** - Field order survives the whole pipeline for diffable backups.

mod database;
mod error;
mod geo;
mod native;
mod path;
mod tag;
mod tagged;

pub use database::{DatabaseId, DocumentRef, DEFAULT_DATABASE_ID};
pub use error::{PathKind, ValueError, ValueResult};
pub use geo::GeoPoint;
pub use native::{Fields, NativeValue, Timestamp};
pub use path::{CollectionPath, DocumentPath, SEPARATOR};
pub use tag::{TypeTag, UnknownTag};
pub use tagged::{TaggedDocument, TaggedValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = TypeTag::ALL;
        let _ = DatabaseId::default_for("demo");
        let _ = GeoPoint::new(0.0, 0.0);
        let _ = DocumentPath::parse("a/b");
        let _ = CollectionPath::parse("a");
        let _ = TaggedDocument::new();
        let _ = Fields::new();

        // Error types
        let _: ValueResult<()> = Ok(());
    }

    #[test]
    fn reference_value_holds_bound_path() {
        let path = DocumentPath::parse("Col/Doc").unwrap();
        let value = NativeValue::from(DocumentRef::new(DatabaseId::default_for("p"), path.clone()));
        assert_eq!(value.as_reference().map(|r| &r.path), Some(&path));
    }
}
