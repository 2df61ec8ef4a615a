//! Uploaded image lifecycle for the catalog backend.
//!
//! An uploaded file is written under the public directory with a
//! collision-resistant stored name and referenced from a product record by
//! its public-relative path (`uploads/<stored-name>`).
//!
//! Superseded images are kept on disk. When a record's image is replaced, the
//! old path is handed to a [`SupersededAssets`] policy; the only policy
//! shipped, [`RetainAll`], leaves the file in place. An upload that never
//! becomes referenced (its save failed) is removed with
//! [`AssetStore::discard`].

pub mod error;
pub mod naming;
pub mod retention;
pub mod store;

pub use error::{AssetError, AssetResult};
pub use naming::{sanitize_file_name, StoredNameGenerator};
pub use retention::{RetainAll, SupersededAssets};
pub use store::{AssetStore, StoredAsset};
