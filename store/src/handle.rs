//! The store capability consumed by the codec and the orchestrator.

use value::{CollectionPath, DatabaseId, DocumentPath, DocumentRef, Fields};

use crate::error::StoreResult;

/// Options for [`StoreHandle::set_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    /// Merge into an existing document instead of replacing it.
    pub merge: bool,
}

impl SetOptions {
    #[must_use]
    pub const fn replace() -> Self {
        Self { merge: false }
    }

    #[must_use]
    pub const fn merge() -> Self {
        Self { merge: true }
    }
}

/// A live binding to one document store instance.
///
/// Reads take `&self`; writes take `&mut self`, so reference resolution,
/// which only reads, can never race a write through the same handle.
pub trait StoreHandle {
    /// Identity of the database this handle is bound to.
    fn database(&self) -> &DatabaseId;

    /// Addresses a collection, top-level when `parent` is `None`.
    fn collection(&self, parent: Option<&DocumentPath>, id: &str) -> StoreResult<CollectionPath> {
        let path = match parent {
            Some(parent) => parent.collection(id)?,
            None => CollectionPath::root(id)?,
        };
        Ok(path)
    }

    /// Lists the collections under `parent`, or the top-level collections.
    fn list_collections(&self, parent: Option<&DocumentPath>) -> StoreResult<Vec<CollectionPath>>;

    /// Lists the documents of a collection.
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<DocumentPath>>;

    /// Reads a document's fields.
    fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<Fields>>;

    /// Creates, replaces or merges a document.
    fn set_document(
        &mut self,
        path: &DocumentPath,
        fields: Fields,
        options: SetOptions,
    ) -> StoreResult<()>;

    /// Returns a reference to `path` bound to this store.
    fn document_ref(&self, path: DocumentPath) -> DocumentRef {
        DocumentRef::new(self.database().clone(), path)
    }
}
