pub mod records;

use axum::Router;

use crate::application::record_service::RecordService;
use crate::domain::{book::Book, todo::Todo};
use records::AppState;

pub fn books<S: RecordService<Book> + Clone>(service: S) -> Router {
    records::router::<Book, S>("/books", AppState { service })
}

pub fn todos<S: RecordService<Todo> + Clone>(service: S) -> Router {
    records::router::<Todo, S>("/todos", AppState { service })
}
