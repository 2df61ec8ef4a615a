use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The text fields of a create-or-edit submission.
///
/// `original_name` is the record's name before the edit, when the caller is
/// editing an existing record. Any uploaded file travels separately.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(default, rename = "productName")]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub in_stock: String,
    #[serde(default)]
    pub original_name: Option<String>,
}

impl ProductForm {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_stock(mut self, raw: impl Into<String>) -> Self {
        self.in_stock = raw.into();
        self
    }

    pub fn with_original_name(mut self, original: impl Into<String>) -> Self {
        self.original_name = Some(original.into());
        self
    }

    /// Check that `name` and `category` are both present and non-empty.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.is_empty() {
            return Err(TypeError::MissingField("productName"));
        }
        if self.category.is_empty() {
            return Err(TypeError::MissingField("category"));
        }
        Ok(())
    }

    /// The edit target, if one was supplied. An empty string counts as absent.
    pub fn target_name(&self) -> Option<&str> {
        self.original_name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn stock_flag(&self) -> bool {
        parse_in_stock(&self.in_stock)
    }
}

/// Form truthiness: only the exact string `"true"` means in stock.
pub fn parse_in_stock(raw: &str) -> bool {
    raw == "true"
}
