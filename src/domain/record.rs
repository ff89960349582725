use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::validation::{Candidate, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Value of a single filterable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FieldValue {
    /// Text compares case-insensitively, everything else exactly. Values of
    /// different kinds never match.
    pub fn matches(&self, query: &FieldValue) -> bool {
        match (self, query) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase() == b.to_lowercase(),
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F> {
    pub field: F,
    pub value: FieldValue,
}

impl<F> Filter<F> {
    pub fn new(field: F, value: FieldValue) -> Self { Self { field, value } }
}

/// A fixed-shape domain item held by a collection store.
///
/// `Request` is the untrusted body the adapter deserializes, `Draft` the
/// validated content without an id, and `Query` the filter parameters a
/// listing endpoint accepts.
pub trait Record: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Request: DeserializeOwned + Send + 'static;
    type Query: DeserializeOwned + Send + 'static;
    type Field: Copy + fmt::Debug + Send + Sync + 'static;

    /// Singular noun used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> RecordId;
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;
    fn field(&self, field: Self::Field) -> FieldValue;

    fn validate(request: Self::Request) -> Result<Candidate<Self::Draft>, ValidationError>;
    fn filters(query: Self::Query) -> Result<Vec<Filter<Self::Field>>, ValidationError>;

    fn matches(&self, filter: &Filter<Self::Field>) -> bool {
        self.field(filter.field).matches(&filter.value)
    }
}
