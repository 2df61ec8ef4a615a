//! Matching a submission to an existing record by name.
//!
//! Rules, in order:
//!
//! 1. If a target (prior) name was supplied, the first record with that name
//!    is the target. If none has it, the submission creates a new record; the
//!    new name is not consulted.
//! 2. Otherwise the first record whose name equals the submitted name is the
//!    target, so re-submitting a record under its own name edits it.
//!
//! When the target name and the new name identify two different records, the
//! target name wins.

use catalog_types::Product;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Index of the record to overwrite.
    Existing(usize),
    /// No match; append a new record.
    New,
}

pub fn resolve(collection: &[Product], target_name: Option<&str>, new_name: &str) -> Resolution {
    let key = target_name.unwrap_or(new_name);
    match collection.iter().position(|p| p.name == key) {
        Some(index) => Resolution::Existing(index),
        None => Resolution::New,
    }
}
