use serde::{Deserialize, Serialize};

use super::record::{FieldValue, Filter, Record, RecordId};
use super::validation::{self, Candidate, ValidationError};

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;
pub const PUBLISHED_MIN: i64 = 1;
pub const PUBLISHED_MAX: i64 = 2022;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: i64,
    pub published_date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: i64,
    pub published_date: i64,
}

/// Body of create and replace requests. `id` is ignored on create.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: i64,
    pub published_date: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<i64>,
    pub published_date: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField { Title, Author, Rating, PublishedDate }

impl BookRequest {
    pub fn validate(self) -> Result<Candidate<BookDraft>, ValidationError> {
        let draft = BookDraft {
            title: validation::text("title", self.title, 3, None)?,
            author: validation::text("author", self.author, 1, None)?,
            description: validation::text("description", self.description, 1, Some(100))?,
            rating: validation::range("rating", self.rating, RATING_MIN, RATING_MAX)?,
            published_date: validation::range("published_date", self.published_date, PUBLISHED_MIN, PUBLISHED_MAX)?,
        };
        Ok(Candidate { id: self.id, draft })
    }
}

impl Record for Book {
    type Draft = BookDraft;
    type Request = BookRequest;
    type Query = BookQuery;
    type Field = BookField;

    const KIND: &'static str = "book";

    fn id(&self) -> RecordId { self.id }

    fn from_draft(id: RecordId, draft: BookDraft) -> Self {
        Book {
            id,
            title: draft.title,
            author: draft.author,
            description: draft.description,
            rating: draft.rating,
            published_date: draft.published_date,
        }
    }

    fn field(&self, field: BookField) -> FieldValue {
        match field {
            BookField::Title => FieldValue::Text(self.title.clone()),
            BookField::Author => FieldValue::Text(self.author.clone()),
            BookField::Rating => FieldValue::Int(self.rating),
            BookField::PublishedDate => FieldValue::Int(self.published_date),
        }
    }

    fn validate(request: BookRequest) -> Result<Candidate<BookDraft>, ValidationError> { request.validate() }

    fn filters(query: BookQuery) -> Result<Vec<Filter<BookField>>, ValidationError> {
        let mut filters = Vec::new();
        if let Some(title) = query.title {
            filters.push(Filter::new(BookField::Title, FieldValue::Text(validation::query_text("title", title)?)));
        }
        if let Some(author) = query.author {
            filters.push(Filter::new(BookField::Author, FieldValue::Text(validation::query_text("author", author)?)));
        }
        if let Some(rating) = query.rating {
            let rating = validation::range("rating", rating, RATING_MIN, RATING_MAX)?;
            filters.push(Filter::new(BookField::Rating, FieldValue::Int(rating)));
        }
        if let Some(year) = query.published_date {
            let year = validation::range("published_date", year, PUBLISHED_MIN, PUBLISHED_MAX)?;
            filters.push(Filter::new(BookField::PublishedDate, FieldValue::Int(year)));
        }
        Ok(filters)
    }
}

/// Books the server starts with.
pub fn seed_books() -> Vec<Book> {
    let rows = [
        (1, "CompSci", "CodingCo", "Good Book", 5, 2012),
        (2, "CompSci2", "CodingCo2", "Good Book2", 5, 2012),
        (3, "CompSci3", "CodingCo3", "Bad Book", 3, 2013),
        (4, "CompSci4", "CodingCo4", "Book Book", 5, 2014),
        (5, "CompSci5", "CodingCo5", "Good Door", 5, 2015),
    ];
    rows.into_iter()
        .map(|(id, title, author, description, rating, published_date)| Book {
            id: RecordId(id),
            title: title.into(),
            author: author.into(),
            description: description.into(),
            rating,
            published_date,
        })
        .collect()
}
