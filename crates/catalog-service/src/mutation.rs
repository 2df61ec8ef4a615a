//! Create, update, and delete on an in-memory collection snapshot.
//!
//! Nothing here touches storage; [`CatalogService`](crate::CatalogService)
//! wraps these in the locked load/save cycle.

use catalog_types::{Collection, Product, ProductForm, TypeError};

use crate::resolver::{resolve, Resolution};

/// What [`apply_upsert`] did to the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Created {
        index: usize,
    },
    Updated {
        index: usize,
        /// The image path this update replaced, if a new upload replaced one.
        replaced_image: Option<String>,
    },
}

impl Applied {
    pub fn index(&self) -> usize {
        match self {
            Self::Created { index } | Self::Updated { index, .. } => *index,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Create or update a record from a submitted form.
///
/// `image` is the public path of an upload received with this submission.
/// On update, the existing image is kept unless `image` is `Some`.
/// Nothing is modified if the form fails validation.
pub fn apply_upsert(
    collection: &mut Collection,
    form: &ProductForm,
    image: Option<&str>,
) -> Result<Applied, TypeError> {
    form.validate()?;

    match resolve(collection, form.target_name(), &form.name) {
        Resolution::Existing(index) => {
            let record = &mut collection[index];
            record.name = form.name.clone();
            record.category = form.category.clone();
            record.in_stock = form.stock_flag();
            let replaced_image = match image {
                Some(path) => Some(std::mem::replace(&mut record.image, path.to_string()))
                    .filter(|old| !old.is_empty() && old != path),
                None => None,
            };
            Ok(Applied::Updated {
                index,
                replaced_image,
            })
        }
        Resolution::New => {
            collection.push(Product {
                name: form.name.clone(),
                category: form.category.clone(),
                image: image.unwrap_or_default().to_string(),
                in_stock: form.stock_flag(),
            });
            Ok(Applied::Created {
                index: collection.len() - 1,
            })
        }
    }
}

/// Remove every record named `name`. Returns how many were removed.
pub fn remove_by_name(collection: &mut Collection, name: &str) -> usize {
    let before = collection.len();
    collection.retain(|p| p.name != name);
    before - collection.len()
}
