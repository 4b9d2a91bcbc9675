//! Document store capability for docvault.
//!
//! The codec and the backup/restore orchestrator never talk to a concrete
//! database. They consume the [`StoreHandle`] trait: list collections, list
//! documents, read fields, write fields. [`MemoryStore`] is the in-process
//! implementation used by the CLI and the tests.

mod error;
mod handle;
mod memory;

pub use error::{StoreError, StoreResult};
pub use handle::{SetOptions, StoreHandle};
pub use memory::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;
    use value::DatabaseId;

    #[test]
    fn public_api_exports() {
        let _ = SetOptions::default();
        let _ = MemoryStore::new(DatabaseId::default_for("demo"));
        let _: StoreResult<()> = Ok(());
    }

    #[test]
    fn store_handle_is_object_safe() {
        let store = MemoryStore::new(DatabaseId::default_for("demo"));
        let handle: &dyn StoreHandle = &store;
        assert_eq!(handle.database().project_id, "demo");
    }

    #[test]
    fn collection_addressing() {
        let store = MemoryStore::new(DatabaseId::default_for("demo"));
        let top = store.collection(None, "users").unwrap();
        let doc = top.doc("alice").unwrap();
        let sub = store.collection(Some(&doc), "posts").unwrap();
        assert_eq!(sub.to_string(), "users/alice/posts");
        assert!(store.collection(None, "").is_err());
    }
}
