//! Catalog mutations for the product collection.
//!
//! Every mutation runs as one load → resolve → apply → save cycle under a
//! process-wide writer lock, so concurrent edits to different records are
//! never lost. Reads take no lock; they rely on the store's atomic save.
//!
//! - [`resolver`] — which existing record, if any, a submission targets
//! - [`mutation`] — pure create/update/delete on an in-memory snapshot
//! - [`CatalogService`] — the locked cycle plus upload bookkeeping

pub mod error;
pub mod mutation;
pub mod resolver;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use mutation::{apply_upsert, remove_by_name, Applied};
pub use resolver::{resolve, Resolution};
pub use service::{CatalogService, MutationOutcome, Upload};
