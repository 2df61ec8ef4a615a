//! Foundation types for the catalog backend.
//!
//! Every other catalog crate depends on `catalog-types`. The types here carry
//! no I/O: they describe what is persisted and what a caller submits.
//!
//! # Key Types
//!
//! - [`Product`] — One catalog record (name, category, image, stock flag)
//! - [`Collection`] — The ordered sequence of all records, persisted as one document
//! - [`ProductForm`] — The fields an operator submits to create or edit a record
//! - [`Credential`] — One operator login record
//!
//! # Identity
//!
//! A product's `name` is its identifier. Uniqueness is expected but not
//! enforced: creating a record under a name that already exists as a
//! *different* record's prior name produces a duplicate.

pub mod credential;
pub mod error;
pub mod form;
pub mod product;

pub use credential::Credential;
pub use error::TypeError;
pub use form::{parse_in_stock, ProductForm};
pub use product::{Collection, Product};
