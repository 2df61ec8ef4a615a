use serde::{Deserialize, Serialize};

/// The full catalog, in insertion order.
///
/// Always read and rewritten as a whole; there is no partial update.
pub type Collection = Vec<Product>;

/// A single catalog entry.
///
/// Serialized as `{"name", "category", "image", "inStock"}`. `image` is a
/// path relative to the public directory (e.g. `uploads/1700000000000-a.png`)
/// or the empty string when no image has been uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub in_stock: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image: String::new(),
            in_stock: false,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Returns `true` if an image has been associated with this record.
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}
