//! Document storage for the catalog backend.
//!
//! The whole product collection lives in a single document that is read in
//! full and rewritten in full on every mutation. This is adequate for tens to
//! low hundreds of records and keeps the file human-inspectable.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`JsonFileStore`] -- pretty-printed JSON array on disk, atomic replace on save
//! - [`InMemoryDocumentStore`] -- `RwLock`-guarded `Vec` for tests and embedding
//!
//! # Design Rules
//!
//! 1. The store is the sole owner of the on-disk representation.
//! 2. `save` replaces the previous document atomically: readers see either the
//!    old document or the new one, never a truncated or interleaved file.
//! 3. A missing document is created once at startup ([`JsonFileStore::init`]);
//!    a missing document on `load` is an error.
//! 4. The store does not serialize writers. Read-modify-write cycles are
//!    guarded by the caller.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
