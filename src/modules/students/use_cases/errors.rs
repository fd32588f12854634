use crate::modules::students::core::validation::ValidationError;
use crate::shared::infrastructure::record_store::RecordStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] RecordStoreError),

    #[error("unexpected: {0}")]
    Unexpected(String),
}
