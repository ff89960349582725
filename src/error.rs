use thiserror::Error;

use crate::domain::store::StoreError;
use crate::domain::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl AppError {
    #[cfg(test)]
    pub fn is_not_found(&self) -> bool { matches!(self, AppError::Store(StoreError::NotFound(_))) }
}
