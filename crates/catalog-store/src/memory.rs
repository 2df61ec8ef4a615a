use std::sync::RwLock;

use catalog_types::Collection;

use crate::error::StoreResult;
use crate::traits::DocumentStore;

/// In-memory document store.
///
/// Intended for tests and embedding. The collection is held behind a
/// `RwLock` and cloned on every load and save, matching the copy semantics
/// of a file-backed store.
pub struct InMemoryDocumentStore {
    collection: RwLock<Collection>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_collection(Collection::new())
    }

    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collection: RwLock::new(collection),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.collection.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self) -> StoreResult<Collection> {
        Ok(self.collection.read().expect("lock poisoned").clone())
    }

    fn save(&self, collection: &Collection) -> StoreResult<()> {
        *self.collection.write().expect("lock poisoned") = collection.clone();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("record_count", &self.len())
            .finish()
    }
}
