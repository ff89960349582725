use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, QueryBuilder, Row, Sqlite,
};

use crate::domain::{
    record::{FieldValue, Filter, RecordId},
    repository::Repository,
    store::StoreError,
    todo::{Todo, TodoDraft, TodoField},
};
use crate::error::AppError;

const TODO_SELECT_SQL: &str = "SELECT id, title, description, priority, complete FROM todos";

/// The single `todos` table. Ids come from SQLite's rowid.
#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if is_in_memory(database_url) {
            pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

// Every connection to `sqlite::memory:` opens its own database.
fn is_in_memory(database_url: &str) -> bool { database_url.contains(":memory:") }

#[async_trait]
impl Repository<Todo> for SqliteTodoRepository {
    async fn init(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                priority INTEGER NOT NULL,
                complete BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let rows = sqlx::query(&format!("{TODO_SELECT_SQL} ORDER BY id"))
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn get(&self, id: RecordId) -> Result<Todo, AppError> {
        let row = sqlx::query(&format!("{TODO_SELECT_SQL} WHERE id = ?1"))
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        match row {
            Some(row) => row_to_todo(&row),
            None => Err(StoreError::NotFound(id).into()),
        }
    }

    async fn filter(&self, filters: Vec<Filter<TodoField>>) -> Result<Vec<Todo>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(TODO_SELECT_SQL);
        for (i, filter) in filters.into_iter().enumerate() {
            query.push(if i == 0 { " WHERE " } else { " AND " });
            let column = filter.field.column();
            match filter.value {
                FieldValue::Text(text) => {
                    query.push(format!("lower({column}) = lower(")).push_bind(text).push(")");
                }
                FieldValue::Int(n) => {
                    query.push(format!("{column} = ")).push_bind(n);
                }
                FieldValue::Bool(b) => {
                    query.push(format!("{column} = ")).push_bind(b);
                }
            }
        }
        query.push(" ORDER BY id");
        let rows = query.build().fetch_all(&*self.pool).await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, AppError> {
        let result = sqlx::query("INSERT INTO todos (title, description, priority, complete) VALUES (?1, ?2, ?3, ?4)")
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.priority)
            .bind(draft.complete)
            .execute(&*self.pool)
            .await?;
        let id = RecordId(result.last_insert_rowid());
        Ok(Todo { id, title: draft.title, description: draft.description, priority: draft.priority, complete: draft.complete })
    }

    async fn replace(&self, id: RecordId, todo: Todo) -> Result<(), AppError> {
        if todo.id != id {
            return Err(StoreError::IdMismatch { expected: id, found: todo.id }.into());
        }
        let result = sqlx::query("UPDATE todos SET title = ?2, description = ?3, priority = ?4, complete = ?5 WHERE id = ?1")
            .bind(id.0)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.priority)
            .bind(todo.complete)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo, AppError> {
    let id: i64 = row.try_get("id")?;
    let priority: i64 = row.try_get("priority")?;
    if id <= 0 {
        return Err(AppError::InvalidData(format!("todo id {id} is not positive")));
    }
    Ok(Todo {
        id: RecordId(id),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority,
        complete: row.try_get("complete")?,
    })
}
