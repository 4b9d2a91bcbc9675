//! Ordered in-memory document store.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use value::{CollectionPath, DatabaseId, DocumentPath, Fields, NativeValue};

use crate::error::StoreResult;
use crate::handle::{SetOptions, StoreHandle};

/// An in-memory store keyed by document path.
///
/// Listing order is the path order, so traversals over a `MemoryStore` are
/// deterministic. A collection exists while it holds at least one document,
/// directly or below a subcollection; a document is listed while it has
/// subcollections, even if it was never written itself.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    database: DatabaseId,
    documents: BTreeMap<DocumentPath, Fields>,
}

impl MemoryStore {
    /// Creates an empty store bound to `database`.
    #[must_use]
    pub fn new(database: DatabaseId) -> Self {
        Self {
            database,
            documents: BTreeMap::new(),
        }
    }

    /// Adds a document, replacing any previous contents.
    #[must_use]
    pub fn with_document(mut self, path: DocumentPath, fields: Fields) -> Self {
        self.documents.insert(path, strip_undefined(fields));
        self
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates all documents in path order.
    pub fn documents(&self) -> impl Iterator<Item = (&DocumentPath, &Fields)> {
        self.documents.iter()
    }
}

impl StoreHandle for MemoryStore {
    fn database(&self) -> &DatabaseId {
        &self.database
    }

    fn list_collections(&self, parent: Option<&DocumentPath>) -> StoreResult<Vec<CollectionPath>> {
        let prefix: &[String] = match parent {
            Some(parent) => parent.segments(),
            None => &[],
        };
        let ids: BTreeSet<&str> = self
            .documents
            .keys()
            .map(DocumentPath::segments)
            .filter(|segments| segments.len() > prefix.len() && segments.starts_with(prefix))
            .map(|segments| segments[prefix.len()].as_str())
            .collect();
        ids.into_iter()
            .map(|id| self.collection(parent, id))
            .collect()
    }

    /// Lists stored documents and the missing parents of deeper documents,
    /// so a walk never loses a subcollection whose parent was never written.
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<DocumentPath>> {
        let prefix = collection.segments();
        let ids: BTreeSet<&str> = self
            .documents
            .keys()
            .map(DocumentPath::segments)
            .filter(|segments| segments.len() > prefix.len() && segments.starts_with(prefix))
            .map(|segments| segments[prefix.len()].as_str())
            .collect();
        ids.into_iter()
            .map(|id| collection.doc(id).map_err(Into::into))
            .collect()
    }

    fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<Fields>> {
        Ok(self.documents.get(path).cloned())
    }

    fn set_document(
        &mut self,
        path: &DocumentPath,
        fields: Fields,
        options: SetOptions,
    ) -> StoreResult<()> {
        debug!(path = %path, merge = options.merge, "set document");
        let fields = strip_undefined(fields);
        match self.documents.get_mut(path) {
            Some(existing) if options.merge => merge_fields(existing, fields),
            _ => {
                self.documents.insert(path.clone(), fields);
            }
        }
        Ok(())
    }
}

fn strip_undefined(fields: Fields) -> Fields {
    fields
        .into_iter()
        .filter(|(_, value)| !value.is_undefined())
        .map(|(key, value)| (key, strip_nested(value)))
        .collect()
}

fn strip_nested(value: NativeValue) -> NativeValue {
    match value {
        NativeValue::Object(fields) => NativeValue::Object(strip_undefined(fields)),
        NativeValue::Array(items) => NativeValue::Array(
            items
                .into_iter()
                .filter(|item| !item.is_undefined())
                .map(strip_nested)
                .collect(),
        ),
        other => other,
    }
}

/// Deep-merges `incoming` into `existing`: nested objects merge key by key,
/// every other value replaces the previous one in place.
fn merge_fields(existing: &mut Fields, incoming: Fields) {
    for (key, value) in incoming {
        match (existing.get_mut(&key), value) {
            (Some(NativeValue::Object(current)), NativeValue::Object(nested)) => {
                merge_fields(current, nested);
            }
            (_, value) => {
                existing.insert(key, value);
            }
        }
    }
}
