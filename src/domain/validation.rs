//! Boundary checks run before anything reaches a store.

use thiserror::Error;

use super::record::RecordId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be an integer")]
    NotAnInteger(&'static str),
    #[error("{0}")]
    Query(String),
}

/// Validated content plus the raw id the caller put in the body, if any.
/// Only replace paths look at (and check) the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<D> {
    pub id: Option<i64>,
    pub draft: D,
}

pub fn text(field: &'static str, value: String, min: usize, max: Option<usize>) -> Result<String, ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(value)
}

pub fn range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}

/// Ids are positive; zero and negatives are rejected.
pub fn record_id(value: i64) -> Result<RecordId, ValidationError> {
    range("id", value, 1, i64::MAX).map(RecordId)
}

/// Parses an id taken from a URL path.
pub fn parse_record_id(raw: &str) -> Result<RecordId, ValidationError> {
    let value = raw.trim().parse::<i64>().map_err(|_| ValidationError::NotAnInteger("id"))?;
    record_id(value)
}

/// Text filters must not be empty.
pub fn query_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    text(field, value, 1, None)
}
