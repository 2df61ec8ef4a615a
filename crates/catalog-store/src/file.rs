use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_types::Collection;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// JSON-array document on the local filesystem.
///
/// On-disk format is a pretty-printed JSON array of product objects:
/// ```text
/// [
///   { "name": "...", "category": "...", "image": "uploads/...", "inStock": true }
/// ]
/// ```
///
/// `save` writes to a temporary file in the same directory, syncs it, and
/// renames it over the document. The rename is atomic on the same
/// filesystem, so a concurrent `load` sees either the old or the new bytes.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store backed by the document at `path`. No I/O is performed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open and run first-start initialization in one step.
    pub fn open_or_init(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::open(path);
        store.init()?;
        Ok(store)
    }

    /// Create the document as an empty collection if it does not exist.
    ///
    /// Returns `true` if the document was created. Intended to run once at
    /// startup; an existing document is never touched.
    pub fn init(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        fs::create_dir_all(self.dir()).map_err(|e| StoreError::unavailable(self.dir(), e))?;
        self.save(&Collection::new())?;
        info!(path = %self.path.display(), "initialized empty product collection");
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Collection> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::unavailable(&self.path, e))?;
        let collection: Collection =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        debug!(path = %self.path.display(), records = collection.len(), "loaded collection");
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(collection)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = self.dir();
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::unavailable(dir, e))?;
        temp.write_all(&data)
            .map_err(|e| StoreError::unavailable(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::unavailable(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::unavailable(&self.path, e.error))?;

        debug!(path = %self.path.display(), records = collection.len(), "saved collection");
        Ok(())
    }
}
