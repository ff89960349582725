use async_trait::async_trait;

use super::record::{Filter, Record, RecordId};
use crate::error::AppError;

#[async_trait]
pub trait Repository<R: Record>: Send + Sync + 'static {
    async fn init(&self) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<R>, AppError>;
    async fn get(&self, id: RecordId) -> Result<R, AppError>;
    async fn filter(&self, filters: Vec<Filter<R::Field>>) -> Result<Vec<R>, AppError>;
    async fn create(&self, draft: R::Draft) -> Result<R, AppError>;
    async fn replace(&self, id: RecordId, record: R) -> Result<(), AppError>;
    async fn delete(&self, id: RecordId) -> Result<(), AppError>;
}
