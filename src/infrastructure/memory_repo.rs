use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    record::{Filter, Record, RecordId},
    repository::Repository,
    store::{CollectionStore, IdPolicy},
};
use crate::error::AppError;

/// A `CollectionStore` shared between request handlers. Each operation takes
/// the lock exactly once.
pub struct InMemoryRepository<R: Record> {
    store: Arc<Mutex<CollectionStore<R>>>,
}

impl<R: Record> Clone for InMemoryRepository<R> {
    fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self { Self::new(IdPolicy::default()) }
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new(policy: IdPolicy) -> Self { Self::seeded(policy, Vec::new()) }

    pub fn seeded(policy: IdPolicy, seed: Vec<R>) -> Self {
        Self { store: Arc::new(Mutex::new(CollectionStore::with_records(policy, seed))) }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize { self.store.lock().await.len() }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn init(&self) -> Result<(), AppError> { Ok(()) }

    async fn list(&self) -> Result<Vec<R>, AppError> { Ok(self.store.lock().await.list_all().to_vec()) }

    async fn get(&self, id: RecordId) -> Result<R, AppError> {
        Ok(self.store.lock().await.get_by_id(id)?.clone())
    }

    async fn filter(&self, filters: Vec<Filter<R::Field>>) -> Result<Vec<R>, AppError> {
        Ok(self.store.lock().await.filter_all(&filters))
    }

    async fn create(&self, draft: R::Draft) -> Result<R, AppError> { Ok(self.store.lock().await.create(draft)) }

    async fn replace(&self, id: RecordId, record: R) -> Result<(), AppError> {
        Ok(self.store.lock().await.replace(id, record)?)
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        self.store.lock().await.delete(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::{Todo, TodoDraft};

    fn draft(title: &str) -> TodoDraft {
        TodoDraft { title: title.into(), description: "something".into(), priority: 3, complete: false }
    }

    #[tokio::test]
    async fn clones_share_one_store() {
        let repo: InMemoryRepository<Todo> = InMemoryRepository::default();
        let other = repo.clone();
        let created = repo.create(draft("Shared")).await.unwrap();
        assert_eq!(other.get(created.id).await.unwrap(), created);
        assert_eq!(other.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let repo: InMemoryRepository<Todo> = InMemoryRepository::default();
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(draft(&format!("Task {i}"))).await.unwrap().id })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().0);
        }
        ids.sort();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let repo: InMemoryRepository<Todo> = InMemoryRepository::default();
        assert!(repo.get(RecordId(1)).await.unwrap_err().is_not_found());
        assert!(repo.delete(RecordId(1)).await.unwrap_err().is_not_found());
    }
}
