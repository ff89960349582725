//! In-memory collection store.
//!
//! Records are kept in insertion order in a `Vec`; every lookup is a linear
//! scan. The store does no locking of its own: callers that share it between
//! tasks wrap it in a single mutex and take it once per operation.

use std::str::FromStr;

use thiserror::Error;

use super::record::{FieldValue, Filter, Record, RecordId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no record with id {0}")]
    NotFound(RecordId),
    #[error("record id {found} does not match requested id {expected}")]
    IdMismatch { expected: RecordId, found: RecordId },
}

/// How `create` picks the next id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Last record's id + 1, or 1 when empty. Can hand out an id that is
    /// still in use once the tail has been deleted.
    #[default]
    Tail,
    /// Highest id present + 1, or 1 when empty.
    Max,
    /// Counter that never goes backwards, not even after deletes.
    Monotonic,
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tail" => Ok(IdPolicy::Tail),
            "max" => Ok(IdPolicy::Max),
            "monotonic" => Ok(IdPolicy::Monotonic),
            other => Err(format!("unknown id policy '{other}' (expected tail, max or monotonic)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionStore<R: Record> {
    records: Vec<R>,
    policy: IdPolicy,
    next_id: i64,
}

impl<R: Record> Default for CollectionStore<R> {
    fn default() -> Self { Self::new(IdPolicy::default()) }
}

impl<R: Record> CollectionStore<R> {
    pub fn new(policy: IdPolicy) -> Self {
        Self { records: Vec::new(), policy, next_id: 1 }
    }

    /// Seeds the store. Seed ids are taken as given.
    pub fn with_records(policy: IdPolicy, seed: Vec<R>) -> Self {
        let next_id = seed.iter().map(|r| r.id().0).max().unwrap_or(0) + 1;
        Self { records: seed, policy, next_id }
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn list_all(&self) -> &[R] { &self.records }

    pub fn get_by_id(&self, id: RecordId) -> Result<&R, StoreError> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn filter_by(&self, field: R::Field, value: &FieldValue) -> Vec<R> {
        self.records
            .iter()
            .filter(|r| r.field(field).matches(value))
            .cloned()
            .collect()
    }

    /// Records matching every filter. No filters means every record.
    pub fn filter_all(&self, filters: &[Filter<R::Field>]) -> Vec<R> {
        self.records
            .iter()
            .filter(|r| filters.iter().all(|f| r.matches(f)))
            .cloned()
            .collect()
    }

    pub fn create(&mut self, draft: R::Draft) -> R {
        let id = self.assign_id();
        let record = R::from_draft(id, draft);
        self.records.push(record.clone());
        record
    }

    pub fn replace(&mut self, id: RecordId, record: R) -> Result<(), StoreError> {
        if record.id() != id {
            return Err(StoreError::IdMismatch { expected: id, found: record.id() });
        }
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = record;
        Ok(())
    }

    pub fn delete(&mut self, id: RecordId) -> Result<R, StoreError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(index))
    }

    fn assign_id(&mut self) -> RecordId {
        let id = match self.policy {
            IdPolicy::Tail => self.records.last().map_or(1, |r| r.id().0 + 1),
            IdPolicy::Max => self.records.iter().map(|r| r.id().0).max().map_or(1, |m| m + 1),
            IdPolicy::Monotonic => self.next_id,
        };
        self.next_id = self.next_id.max(id + 1);
        RecordId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Book, BookDraft, BookField, seed_books};

    fn draft(title: &str, rating: i64) -> BookDraft {
        BookDraft {
            title: title.into(),
            author: "Someone".into(),
            description: "A book".into(),
            rating,
            published_date: 2000,
        }
    }

    fn seeded() -> CollectionStore<Book> { CollectionStore::with_records(IdPolicy::Tail, seed_books()) }

    #[test]
    fn empty_store_lists_nothing_and_starts_at_one() {
        let mut store: CollectionStore<Book> = CollectionStore::default();
        assert!(store.list_all().is_empty());
        assert_eq!(store.create(draft("First", 4)).id, RecordId(1));
    }

    #[test]
    fn sequential_creates_have_increasing_ids() {
        let mut store: CollectionStore<Book> = CollectionStore::default();
        let ids: Vec<i64> = (0..5).map(|i| store.create(draft("Title", 1 + i % 5)).id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ids_keep_increasing_after_middle_deletes() {
        let mut store: CollectionStore<Book> = CollectionStore::default();
        for _ in 0..4 {
            store.create(draft("Title", 3));
        }
        store.delete(RecordId(2)).unwrap();
        assert_eq!(store.create(draft("Next", 3)).id, RecordId(5));
        assert_eq!(store.create(draft("Next", 3)).id, RecordId(6));
    }

    #[test]
    fn create_then_get_returns_the_record() {
        let mut store = seeded();
        let created = store.create(draft("Roundtrip", 2));
        assert_eq!(store.get_by_id(created.id).unwrap(), &created);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let mut store = seeded();
        let removed = store.delete(RecordId(4)).unwrap();
        assert_eq!(removed.id, RecordId(4));
        assert_eq!(store.get_by_id(RecordId(4)), Err(StoreError::NotFound(RecordId(4))));
        assert_eq!(store.delete(RecordId(4)), Err(StoreError::NotFound(RecordId(4))));
    }

    #[test]
    fn length_tracks_creates_minus_deletes() {
        let mut store: CollectionStore<Book> = CollectionStore::default();
        let a = store.create(draft("One", 1));
        store.create(draft("Two", 2));
        store.create(draft("Three", 3));
        store.delete(a.id).unwrap();
        assert!(store.delete(RecordId(99)).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn filter_on_absent_value_is_empty() {
        let store = seeded();
        assert!(store.filter_by(BookField::Author, &FieldValue::Text("nobody".into())).is_empty());
        assert!(store.filter_by(BookField::Rating, &FieldValue::Int(1)).is_empty());
    }

    #[test]
    fn author_filter_is_case_insensitive() {
        let store = seeded();
        let found = store.filter_by(BookField::Author, &FieldValue::Text("codingco2".into()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, RecordId(2));
    }

    #[test]
    fn filter_all_is_conjunctive() {
        let store = seeded();
        let filters = vec![
            Filter::new(BookField::Rating, FieldValue::Int(5)),
            Filter::new(BookField::PublishedDate, FieldValue::Int(2012)),
        ];
        let ids: Vec<RecordId> = store.filter_all(&filters).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(2)]);
        assert_eq!(store.filter_all(&[]).len(), 5);
    }

    #[test]
    fn replace_rejects_mismatched_id() {
        let mut store = seeded();
        let other = store.get_by_id(RecordId(2)).unwrap().clone();
        assert_eq!(
            store.replace(RecordId(1), other),
            Err(StoreError::IdMismatch { expected: RecordId(1), found: RecordId(2) })
        );
        assert_eq!(store.get_by_id(RecordId(1)).unwrap().title, "CompSci");
    }

    #[test]
    fn replace_missing_is_not_found() {
        let mut store = seeded();
        let ghost = Book::from_draft(RecordId(42), draft("Ghost", 1));
        assert_eq!(store.replace(RecordId(42), ghost), Err(StoreError::NotFound(RecordId(42))));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn seeded_rating_scenario() {
        let mut store = seeded();
        let five = FieldValue::Int(5);
        assert_eq!(store.filter_by(BookField::Rating, &five).len(), 4);

        let mut third = store.get_by_id(RecordId(3)).unwrap().clone();
        third.rating = 5;
        store.replace(RecordId(3), third).unwrap();
        assert_eq!(store.filter_by(BookField::Rating, &five).len(), 5);

        store.delete(RecordId(3)).unwrap();
        assert_eq!(store.get_by_id(RecordId(3)), Err(StoreError::NotFound(RecordId(3))));

        assert_eq!(store.create(draft("New", 4)).id, RecordId(6));
    }

    #[test]
    fn tail_policy_reuses_ids_after_tail_delete() {
        let mut store: CollectionStore<Book> = CollectionStore::default();
        for _ in 0..3 {
            store.create(draft("Title", 3));
        }
        store.delete(RecordId(3)).unwrap();
        assert_eq!(store.create(draft("Again", 3)).id, RecordId(3));
    }

    #[test]
    fn tail_policy_can_duplicate_ids() {
        let mut store: CollectionStore<Book> = CollectionStore::with_records(
            IdPolicy::Tail,
            vec![Book::from_draft(RecordId(5), draft("High", 1)), Book::from_draft(RecordId(2), draft("Low", 1))],
        );
        assert_eq!(store.create(draft("Dup", 1)).id, RecordId(3));
        assert_eq!(store.create(draft("Dup", 1)).id, RecordId(4));
        assert_eq!(store.create(draft("Dup", 1)).id, RecordId(5));
        assert_eq!(store.filter_by(BookField::Title, &FieldValue::Text("high".into()))[0].id, RecordId(5));
        assert_eq!(store.list_all().iter().filter(|b| b.id == RecordId(5)).count(), 2);
    }

    #[test]
    fn max_policy_skips_past_highest_id() {
        let mut store: CollectionStore<Book> = CollectionStore::with_records(
            IdPolicy::Max,
            vec![Book::from_draft(RecordId(5), draft("High", 1)), Book::from_draft(RecordId(2), draft("Low", 1))],
        );
        assert_eq!(store.create(draft("Next", 1)).id, RecordId(6));
    }

    #[test]
    fn monotonic_policy_never_reuses() {
        let mut store: CollectionStore<Book> = CollectionStore::with_records(IdPolicy::Monotonic, seed_books());
        store.delete(RecordId(5)).unwrap();
        assert_eq!(store.create(draft("Next", 1)).id, RecordId(6));
        for id in 1..=6 {
            let _ = store.delete(RecordId(id));
        }
        assert!(store.is_empty());
        assert_eq!(store.create(draft("After", 1)).id, RecordId(7));
    }

    #[test]
    fn id_policy_parses_names() {
        assert_eq!("tail".parse::<IdPolicy>(), Ok(IdPolicy::Tail));
        assert_eq!(" MAX ".parse::<IdPolicy>(), Ok(IdPolicy::Max));
        assert_eq!("monotonic".parse::<IdPolicy>(), Ok(IdPolicy::Monotonic));
        assert!("random".parse::<IdPolicy>().is_err());
    }
}
