use crate::error::AssetResult;

/// Decides what happens to an image once a record stops referencing it.
///
/// Called after the collection referencing the replacement has been saved.
/// Implementations that delete files must tolerate the same path being
/// referenced by another record, since names are not unique.
pub trait SupersededAssets: Send + Sync {
    fn superseded(&self, product: &str, previous_image: &str) -> AssetResult<()>;
}

/// Keep every superseded image on disk.
pub struct RetainAll;

impl SupersededAssets for RetainAll {
    fn superseded(&self, product: &str, previous_image: &str) -> AssetResult<()> {
        tracing::debug!(product, image = previous_image, "retaining superseded image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_all_accepts_everything() {
        let policy = RetainAll;
        policy.superseded("Sneaker A", "uploads/1-a.png").unwrap();
        policy.superseded("Sneaker A", "").unwrap();
    }
}
