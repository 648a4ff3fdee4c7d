use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use liftlog_core::{WorkoutEntry, WorkoutRequest};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemBody<T> {
    pub item: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct ItemsBody<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutQuery {
    pub exercise: Option<String>,
    pub limit: Option<String>,
}

/// An empty body is an empty object; a JSON value that is not an object
/// carries no fields.
fn parse_workout_body(body: &[u8]) -> Result<WorkoutRequest, ApiError> {
    if body.is_empty() {
        return Ok(WorkoutRequest::default());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Request body must be valid JSON".to_string()))?;

    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|_| ApiError::BadRequest("Request body must be valid JSON".to_string())),
        _ => Ok(WorkoutRequest::default()),
    }
}

/// `POST /workouts`: validate, store and return the new entry.
pub async fn create_workout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ItemBody<WorkoutEntry>>), ApiError> {
    let request = parse_workout_body(&body)?;
    let entry = state
        .call(move |service| service.log_workout(&request, Utc::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(ItemBody { item: Some(entry) })))
}

/// `GET /workouts/latest?exercise=`: most recent entry, or `null`.
pub async fn latest_workout(
    State(state): State<AppState>,
    query: Result<Query<WorkoutQuery>, QueryRejection>,
) -> Result<Json<ItemBody<WorkoutEntry>>, ApiError> {
    let Query(query) = query?;
    let item = state
        .call(move |service| service.latest_workout(query.exercise.as_deref()))
        .await?;
    Ok(Json(ItemBody { item }))
}

/// `GET /workouts?exercise=&limit=`: history, newest first.
pub async fn workout_history(
    State(state): State<AppState>,
    query: Result<Query<WorkoutQuery>, QueryRejection>,
) -> Result<Json<ItemsBody<WorkoutEntry>>, ApiError> {
    let Query(query) = query?;
    let items = state
        .call(move |service| {
            service.workout_history(query.exercise.as_deref(), query.limit.as_deref())
        })
        .await?;
    Ok(Json(ItemsBody { items }))
}
