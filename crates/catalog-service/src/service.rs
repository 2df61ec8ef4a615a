use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catalog_assets::{AssetStore, RetainAll, StoredAsset, SupersededAssets};
use catalog_store::DocumentStore;
use catalog_types::{Collection, Product, ProductForm};
use tracing::{debug, info, warn};

use crate::error::ServiceResult;
use crate::mutation::{apply_upsert, remove_by_name, Applied};

/// A file received alongside a submission, not yet written anywhere.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// Result of a successful create-or-update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationOutcome {
    pub applied: Applied,
    pub product: Product,
}

/// The catalog's mutation entry point.
///
/// Owns the writer lock. Every mutating call holds it for exactly one
/// load → apply → save cycle. Performs no authorization.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    assets: Arc<AssetStore>,
    superseded: Arc<dyn SupersededAssets>,
    writer: Mutex<()>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>, assets: Arc<AssetStore>) -> Self {
        Self {
            store,
            assets,
            superseded: Arc::new(RetainAll),
            writer: Mutex::new(()),
        }
    }

    /// Replace the policy applied to images that stop being referenced.
    pub fn with_superseded_policy(mut self, policy: Arc<dyn SupersededAssets>) -> Self {
        self.superseded = policy;
        self
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Current collection. Takes no lock.
    pub fn list(&self) -> ServiceResult<Collection> {
        Ok(self.store.load()?)
    }

    /// Create a record or update the one the form resolves to.
    ///
    /// The form is validated before the upload is written or the lock is
    /// taken. If the cycle fails after the upload was written, the upload is
    /// removed again; a failed request leaves neither a changed document nor a
    /// new file behind.
    pub fn upsert(&self, form: &ProductForm, upload: Option<Upload>) -> ServiceResult<MutationOutcome> {
        form.validate()?;

        let asset = upload
            .map(|u| self.assets.store(&u.file_name, &u.data))
            .transpose()?;

        let result = self.upsert_locked(form, asset.as_ref());
        if result.is_err() {
            if let Some(asset) = &asset {
                if let Err(e) = self.assets.discard(asset) {
                    warn!(path = %asset.public_path, error = %e, "orphaned upload left on disk");
                }
            }
        }
        let outcome = result?;

        if let Applied::Updated {
            replaced_image: Some(previous),
            ..
        } = &outcome.applied
        {
            if let Err(e) = self.superseded.superseded(&outcome.product.name, previous) {
                warn!(product = %outcome.product.name, image = %previous, error = %e, "superseded image policy failed");
            }
        }

        Ok(outcome)
    }

    fn upsert_locked(&self, form: &ProductForm, asset: Option<&StoredAsset>) -> ServiceResult<MutationOutcome> {
        let _guard = self.lock();
        let mut collection = self.store.load()?;
        let applied = apply_upsert(
            &mut collection,
            form,
            asset.map(|a| a.public_path.as_str()),
        )?;
        let product = collection[applied.index()].clone();
        debug!(?applied, target = ?form.target_name(), "resolved submission");
        self.store.save(&collection)?;

        if applied.is_created() {
            info!(product = %product.name, "created product");
        } else {
            info!(product = %product.name, "updated product");
        }
        Ok(MutationOutcome { applied, product })
    }

    /// Remove every record with this name. Returns how many were removed.
    ///
    /// Removing a name that does not exist succeeds and leaves the document
    /// untouched.
    pub fn delete(&self, name: &str) -> ServiceResult<usize> {
        let _guard = self.lock();
        let mut collection = self.store.load()?;
        let removed = remove_by_name(&mut collection, name);
        if removed == 0 {
            debug!(product = name, "delete matched nothing");
            return Ok(0);
        }
        self.store.save(&collection)?;
        info!(product = name, removed, "deleted product");
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`; a panic in another holder cannot have
        // left it inconsistent.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use catalog_assets::AssetResult;
    use catalog_store::{InMemoryDocumentStore, JsonFileStore, StoreError, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<JsonFileStore>,
        service: Arc<CatalogService>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::open_or_init(dir.path().join("products.json")).unwrap());
        let assets = Arc::new(AssetStore::open(dir.path().join("public"), "uploads").unwrap());
        let service = Arc::new(CatalogService::new(store.clone(), assets));
        Fixture {
            _dir: dir,
            store,
            service,
        }
    }

    fn upload_count(service: &CatalogService) -> usize {
        std::fs::read_dir(service.assets().public_dir().join("uploads"))
            .unwrap()
            .count()
    }

    /// Store whose saves always fail, for exercising rollback paths.
    struct ReadOnlyStore(InMemoryDocumentStore);

    impl DocumentStore for ReadOnlyStore {
        fn load(&self) -> StoreResult<Collection> {
            self.0.load()
        }

        fn save(&self, _collection: &Collection) -> StoreResult<()> {
            Err(StoreError::Unavailable {
                path: "products.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[derive(Default)]
    struct CountingPolicy(AtomicUsize);

    impl SupersededAssets for CountingPolicy {
        fn superseded(&self, _product: &str, _previous_image: &str) -> AssetResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn create_new_product_scenario() {
        let f = fixture();
        f.service
            .upsert(&ProductForm::new("Sneaker A", "Casual"), None)
            .unwrap();
        assert_eq!(f.store.load().unwrap(), vec![Product::new("Sneaker A", "Casual")]);
    }

    #[test]
    fn edit_by_original_name_scenario() {
        let f = fixture();
        f.service
            .upsert(&ProductForm::new("Sneaker A", "Casual"), None)
            .unwrap();
        let outcome = f
            .service
            .upsert(
                &ProductForm::new("Sneaker A", "Formal").with_original_name("Sneaker A"),
                None,
            )
            .unwrap();
        assert!(!outcome.applied.is_created());
        let c = f.store.load().unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].category, "Formal");
    }

    #[test]
    fn delete_twice_is_idempotent() {
        let f = fixture();
        f.service
            .upsert(&ProductForm::new("Sneaker A", "Casual"), None)
            .unwrap();
        f.service
            .upsert(&ProductForm::new("Oxford", "Formal"), None)
            .unwrap();

        assert_eq!(f.service.delete("Sneaker A").unwrap(), 1);
        assert_eq!(f.store.load().unwrap().len(), 1);
        assert_eq!(f.service.delete("Sneaker A").unwrap(), 0);
        assert_eq!(f.store.load().unwrap().len(), 1);
    }

    #[test]
    fn upload_is_recorded_and_kept_on_sparse_update() {
        let f = fixture();
        let created = f
            .service
            .upsert(
                &ProductForm::new("Sneaker A", "Casual"),
                Some(Upload::new("a.png", b"png".to_vec())),
            )
            .unwrap();
        let image = created.product.image.clone();
        assert!(image.starts_with("uploads/") && image.ends_with("-a.png"));

        f.service
            .upsert(
                &ProductForm::new("Sneaker A", "Running").with_original_name("Sneaker A"),
                None,
            )
            .unwrap();
        assert_eq!(f.store.load().unwrap()[0].image, image);
    }

    #[test]
    fn replaced_image_is_retained_on_disk() {
        let f = fixture();
        let first = f
            .service
            .upsert(
                &ProductForm::new("Sneaker A", "Casual"),
                Some(Upload::new("a.png", b"one".to_vec())),
            )
            .unwrap();
        let second = f
            .service
            .upsert(
                &ProductForm::new("Sneaker A", "Casual"),
                Some(Upload::new("b.png", b"two".to_vec())),
            )
            .unwrap();
        assert_ne!(first.product.image, second.product.image);
        assert!(f.service.assets().resolve(&first.product.image).exists());
        assert_eq!(upload_count(&f.service), 2);
    }

    #[test]
    fn superseded_policy_sees_replaced_images_only() {
        let dir = tempfile::tempdir().unwrap();
        let policy = Arc::new(CountingPolicy::default());
        let service = CatalogService::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(AssetStore::open(dir.path(), "uploads").unwrap()),
        )
        .with_superseded_policy(policy.clone());

        let form = ProductForm::new("Sneaker A", "Casual");
        service.upsert(&form, Some(Upload::new("a.png", b"1".to_vec()))).unwrap();
        service.upsert(&form, None).unwrap();
        assert_eq!(policy.0.load(Ordering::SeqCst), 0);
        service.upsert(&form, Some(Upload::new("b.png", b"2".to_vec()))).unwrap();
        assert_eq!(policy.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn validation_failure_writes_nothing() {
        let f = fixture();
        let err = f
            .service
            .upsert(
                &ProductForm::new("Sneaker A", ""),
                Some(Upload::new("a.png", b"x".to_vec())),
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(upload_count(&f.service), 0);
        assert!(f.store.load().unwrap().is_empty());
    }

    #[test]
    fn failed_save_discards_upload() {
        let dir = tempfile::tempdir().unwrap();
        let service = CatalogService::new(
            Arc::new(ReadOnlyStore(InMemoryDocumentStore::new())),
            Arc::new(AssetStore::open(dir.path(), "uploads").unwrap()),
        );
        let err = service
            .upsert(
                &ProductForm::new("Sneaker A", "Casual"),
                Some(Upload::new("a.png", b"x".to_vec())),
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable { .. })));
        assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
    }

    #[test]
    fn failed_load_surfaces_store_error() {
        let f = fixture();
        std::fs::remove_file(f.store.path()).unwrap();
        assert!(matches!(f.service.list(), Err(ServiceError::Store(_))));
        assert!(matches!(
            f.service.delete("anything"),
            Err(ServiceError::Store(_))
        ));
    }

    #[test]
    fn concurrent_updates_to_different_records_all_survive() {
        let f = fixture();
        let names: Vec<String> = (0..8).map(|i| format!("product-{i}")).collect();
        for name in &names {
            f.service.upsert(&ProductForm::new(name.as_str(), "initial"), None).unwrap();
        }

        std::thread::scope(|s| {
            for name in &names {
                let service = &f.service;
                s.spawn(move || {
                    for round in 0..10 {
                        let form = ProductForm::new(name.as_str(), format!("round-{round}"))
                            .with_original_name(name.as_str());
                        service.upsert(&form, None).unwrap();
                    }
                });
            }
        });

        let c = f.store.load().unwrap();
        assert_eq!(c.len(), names.len());
        assert!(c.iter().all(|p| p.category == "round-9"));
    }

    #[test]
    fn concurrent_creates_are_not_lost() {
        let f = fixture();
        std::thread::scope(|s| {
            for t in 0..4 {
                let service = &f.service;
                s.spawn(move || {
                    for i in 0..10 {
                        let form = ProductForm::new(format!("t{t}-{i}"), "bulk");
                        service.upsert(&form, None).unwrap();
                    }
                });
            }
        });
        assert_eq!(f.store.load().unwrap().len(), 40);
    }
}
