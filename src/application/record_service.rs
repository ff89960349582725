use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::record::{Record, RecordId};
use crate::domain::repository::Repository;
use crate::domain::validation::{self, ValidationError};
use crate::error::AppError;

#[async_trait]
pub trait RecordService<R: Record>: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<R>, AppError>;
    async fn get(&self, id: RecordId) -> Result<R, AppError>;
    async fn filter(&self, query: R::Query) -> Result<Vec<R>, AppError>;
    async fn create(&self, request: R::Request) -> Result<R, AppError>;
    async fn replace(&self, id: RecordId, request: R::Request) -> Result<(), AppError>;
    async fn replace_by_body(&self, request: R::Request) -> Result<(), AppError>;
    async fn delete(&self, id: RecordId) -> Result<(), AppError>;
}

pub struct RecordServiceImpl<R, Repo> {
    repo: Repo,
    _record: PhantomData<fn() -> R>,
}

impl<R, Repo: Clone> Clone for RecordServiceImpl<R, Repo> {
    fn clone(&self) -> Self { Self::new(self.repo.clone()) }
}

impl<R, Repo> RecordServiceImpl<R, Repo> {
    pub fn new(repo: Repo) -> Self { Self { repo, _record: PhantomData } }
}

#[async_trait]
impl<R: Record, Repo: Repository<R>> RecordService<R> for RecordServiceImpl<R, Repo> {
    async fn list(&self) -> Result<Vec<R>, AppError> { self.repo.list().await }

    async fn get(&self, id: RecordId) -> Result<R, AppError> { self.repo.get(id).await }

    async fn filter(&self, query: R::Query) -> Result<Vec<R>, AppError> {
        let filters = R::filters(query)?;
        if filters.is_empty() {
            return self.repo.list().await;
        }
        self.repo.filter(filters).await
    }

    async fn create(&self, request: R::Request) -> Result<R, AppError> {
        // A caller-supplied id never survives creation.
        let candidate = R::validate(request)?;
        let record = self.repo.create(candidate.draft).await?;
        tracing::info!(kind = R::KIND, id = %record.id(), "created");
        Ok(record)
    }

    async fn replace(&self, id: RecordId, request: R::Request) -> Result<(), AppError> {
        let candidate = R::validate(request)?;
        let record_id = match candidate.id {
            Some(raw) => validation::record_id(raw)?,
            None => id,
        };
        let record = R::from_draft(record_id, candidate.draft);
        self.repo.replace(id, record).await?;
        tracing::info!(kind = R::KIND, %id, "replaced");
        Ok(())
    }

    async fn replace_by_body(&self, request: R::Request) -> Result<(), AppError> {
        let candidate = R::validate(request)?;
        let id = validation::record_id(candidate.id.ok_or(ValidationError::Missing("id"))?)?;
        self.repo.replace(id, R::from_draft(id, candidate.draft)).await?;
        tracing::info!(kind = R::KIND, %id, "replaced");
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        tracing::info!(kind = R::KIND, %id, "deleted");
        Ok(())
    }
}
