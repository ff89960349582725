use serde::{Deserialize, Serialize};

use super::record::{FieldValue, Filter, Record, RecordId};
use super::validation::{self, Candidate, ValidationError};

pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub priority: i64,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoQuery {
    pub title: Option<String>,
    pub priority: Option<i64>,
    pub complete: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoField { Title, Priority, Complete }

impl TodoField {
    pub fn column(self) -> &'static str {
        match self {
            TodoField::Title => "title",
            TodoField::Priority => "priority",
            TodoField::Complete => "complete",
        }
    }
}

impl TodoRequest {
    pub fn validate(self) -> Result<Candidate<TodoDraft>, ValidationError> {
        let draft = TodoDraft {
            title: validation::text("title", self.title, 3, None)?,
            description: validation::text("description", self.description, 1, Some(100))?,
            priority: validation::range("priority", self.priority, PRIORITY_MIN, PRIORITY_MAX)?,
            complete: self.complete,
        };
        Ok(Candidate { id: self.id, draft })
    }
}

impl From<&Todo> for TodoRequest {
    fn from(todo: &Todo) -> Self {
        TodoRequest {
            id: Some(todo.id.0),
            title: todo.title.clone(),
            description: todo.description.clone(),
            priority: todo.priority,
            complete: todo.complete,
        }
    }
}

impl Record for Todo {
    type Draft = TodoDraft;
    type Request = TodoRequest;
    type Query = TodoQuery;
    type Field = TodoField;

    const KIND: &'static str = "todo";

    fn id(&self) -> RecordId { self.id }

    fn from_draft(id: RecordId, draft: TodoDraft) -> Self {
        Todo { id, title: draft.title, description: draft.description, priority: draft.priority, complete: draft.complete }
    }

    fn field(&self, field: TodoField) -> FieldValue {
        match field {
            TodoField::Title => FieldValue::Text(self.title.clone()),
            TodoField::Priority => FieldValue::Int(self.priority),
            TodoField::Complete => FieldValue::Bool(self.complete),
        }
    }

    fn validate(request: TodoRequest) -> Result<Candidate<TodoDraft>, ValidationError> { request.validate() }

    fn filters(query: TodoQuery) -> Result<Vec<Filter<TodoField>>, ValidationError> {
        let mut filters = Vec::new();
        if let Some(title) = query.title {
            filters.push(Filter::new(TodoField::Title, FieldValue::Text(validation::query_text("title", title)?)));
        }
        if let Some(priority) = query.priority {
            let priority = validation::range("priority", priority, PRIORITY_MIN, PRIORITY_MAX)?;
            filters.push(Filter::new(TodoField::Priority, FieldValue::Int(priority)));
        }
        if let Some(complete) = query.complete {
            filters.push(Filter::new(TodoField::Complete, FieldValue::Bool(complete)));
        }
        Ok(filters)
    }
}
