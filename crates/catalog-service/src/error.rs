use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] catalog_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] catalog_store::StoreError),

    #[error("asset error: {0}")]
    Asset(#[from] catalog_assets::AssetError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
