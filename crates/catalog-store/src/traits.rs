use catalog_types::Collection;

use crate::error::StoreResult;

/// Whole-document storage for the product collection.
///
/// All implementations must satisfy these invariants:
/// - `load` returns the records in the order they were saved.
/// - `save` replaces the entire previous collection.
/// - A concurrent `load` never observes a partially written `save`.
/// - All I/O errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Read the entire persisted collection.
    fn load(&self) -> StoreResult<Collection>;

    /// Serialize and write the entire collection, replacing prior contents.
    fn save(&self, collection: &Collection) -> StoreResult<()>;
}
