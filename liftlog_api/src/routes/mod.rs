pub mod exercises;
pub mod workouts;

use crate::error::ApiError;

/// Any method/path the router does not know.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
