use thiserror::Error;

/// Errors produced when checking submitted values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
