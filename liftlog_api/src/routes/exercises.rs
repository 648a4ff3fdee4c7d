use axum::extract::State;
use axum::Json;

use liftlog_core::ExerciseCatalogEntry;

use crate::error::ApiError;
use crate::routes::workouts::ItemsBody;
use crate::state::AppState;

/// `GET /exercises`: the owner's catalog, most recently used first.
pub async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<ItemsBody<ExerciseCatalogEntry>>, ApiError> {
    let items = state.call(|service| service.list_exercises()).await?;
    Ok(Json(ItemsBody { items }))
}
