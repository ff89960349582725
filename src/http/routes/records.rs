use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::{
    application::record_service::RecordService,
    domain::{record::{Record, RecordId}, validation::{self, ValidationError}},
    error::AppError,
};

#[derive(Clone)]
pub struct AppState<S> { pub service: S }

/// CRUD routes for one record type mounted under `base`, plus
/// `PUT {base}/update_{kind}` which takes the id from the body.
pub fn router<R, S>(base: &str, state: AppState<S>) -> Router
where
    R: Record,
    S: RecordService<R> + Clone,
{
    Router::new()
        .route(base, get(list_records::<R, S>).post(create_record::<R, S>))
        .route(&format!("{base}/update_{}", R::KIND), put(replace_by_body::<R, S>))
        .route(
            &format!("{base}/:id"),
            get(get_record::<R, S>).put(replace_record::<R, S>).delete(delete_record::<R, S>),
        )
        .with_state(state)
}

async fn list_records<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, query: Result<Query<R::Query>, QueryRejection>) -> Result<Json<Vec<R>>, AppError> {
    let Query(query) = query.map_err(|rejection| ValidationError::Query(rejection.body_text()))?;
    Ok(Json(state.service.filter(query).await?))
}

async fn create_record<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, Json(payload): Json<R::Request>) -> Result<(StatusCode, Json<R>), AppError> {
    let record = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<R>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

async fn replace_record<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, Path(id): Path<String>, Json(payload): Json<R::Request>) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.service.replace(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn replace_by_body<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, Json(payload): Json<R::Request>) -> Result<StatusCode, AppError> {
    state.service.replace_by_body(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_record<R: Record, S: RecordService<R>>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(s: &str) -> Result<RecordId, AppError> { Ok(validation::parse_record_id(s)?) }
