use axum::{routing::get, Router};

use crate::application::record_service::RecordServiceImpl;
use crate::config::{AppConfig, TodoBackend};
use crate::domain::{book::{Book, seed_books}, repository::Repository, todo::Todo};
use crate::error::AppError;
use crate::http::routes;
use crate::infrastructure::{memory_repo::InMemoryRepository, sqlite_repo::SqliteTodoRepository};

pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
}

/// Books always live in memory, seeded; todos go where the config says.
pub async fn build(config: &AppConfig) -> Result<Router, AppError> {
    let books = InMemoryRepository::seeded(config.id_policy, seed_books());
    let books_router = routes::books(RecordServiceImpl::<Book, _>::new(books));

    let todos_router = match config.todo_backend {
        TodoBackend::Sqlite => {
            let repo = SqliteTodoRepository::connect(&config.database_url).await?;
            repo.init().await?;
            routes::todos(RecordServiceImpl::<Todo, _>::new(repo))
        }
        TodoBackend::Memory => {
            let repo = InMemoryRepository::<Todo>::new(config.id_policy);
            routes::todos(RecordServiceImpl::<Todo, _>::new(repo))
        }
    };
    tracing::info!(backend = ?config.todo_backend, id_policy = ?config.id_policy, "routes ready");

    Ok(app(books_router.merge(todos_router)))
}
