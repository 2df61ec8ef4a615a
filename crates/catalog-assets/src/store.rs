use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{AssetError, AssetResult};
use crate::naming::StoredNameGenerator;

/// An upload that has been written to the uploads directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredAsset {
    /// Path relative to the public directory, as recorded in `Product::image`.
    pub public_path: String,
    /// Location on disk.
    pub disk_path: PathBuf,
}

/// Writes uploaded images under `<public_dir>/<uploads_dir>/`.
pub struct AssetStore {
    public_dir: PathBuf,
    uploads_dir: PathBuf,
    names: StoredNameGenerator,
}

impl AssetStore {
    /// Open the store, creating the uploads directory if needed.
    ///
    /// `uploads_dir` is relative to `public_dir` and becomes the leading
    /// component of every recorded image path.
    pub fn open(public_dir: impl Into<PathBuf>, uploads_dir: impl Into<PathBuf>) -> AssetResult<Self> {
        let store = Self {
            public_dir: public_dir.into(),
            uploads_dir: uploads_dir.into(),
            names: StoredNameGenerator::new(),
        };
        let dir = store.upload_root();
        fs::create_dir_all(&dir).map_err(|e| AssetError::io(&dir, e))?;
        info!(dir = %dir.display(), "asset store ready");
        Ok(store)
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    fn upload_root(&self) -> PathBuf {
        self.public_dir.join(&self.uploads_dir)
    }

    /// Write an upload under a fresh stored name.
    ///
    /// Never overwrites an existing file.
    pub fn store(&self, original_name: &str, data: &[u8]) -> AssetResult<StoredAsset> {
        let root = self.upload_root();
        let stored_name = self.names.stored_name(original_name);
        let disk_path = root.join(&stored_name);

        let mut temp = NamedTempFile::new_in(&root).map_err(|e| AssetError::io(&root, e))?;
        temp.write_all(data)
            .map_err(|e| AssetError::io(temp.path(), e))?;
        temp.persist_noclobber(&disk_path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                AssetError::NameTaken(stored_name.clone())
            } else {
                AssetError::io(&disk_path, e.error)
            }
        })?;

        let public_path = self.public_path_for(&stored_name);
        debug!(original = original_name, path = %public_path, bytes = data.len(), "stored upload");
        Ok(StoredAsset {
            public_path,
            disk_path,
        })
    }

    /// Remove an upload that was never referenced by a saved record.
    pub fn discard(&self, asset: &StoredAsset) -> AssetResult<()> {
        match fs::remove_file(&asset.disk_path) {
            Ok(()) => {
                debug!(path = %asset.public_path, "discarded unreferenced upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = %asset.public_path, error = %e, "failed to discard upload");
                Err(AssetError::io(&asset.disk_path, e))
            }
        }
    }

    /// Disk location of a recorded image path.
    pub fn resolve(&self, public_path: &str) -> PathBuf {
        self.public_dir.join(public_path)
    }

    fn public_path_for(&self, stored_name: &str) -> String {
        let mut parts: Vec<String> = self
            .uploads_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.push(stored_name.to_string());
        parts.join("/")
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("public_dir", &self.public_dir)
            .field("uploads_dir", &self.uploads_dir)
            .finish()
    }
}
