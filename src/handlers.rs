use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::{info, warn};

use crate::{
    error::AppError,
    models::{UploadQuery, UploadQueryResult},
    state::AppState,
};

/// List stored uploads with search, pagination and sorting.
///
/// Query string: `searchQuery`, `page`, `pageSize`, `sortBy`, `sortDirection`.
pub async fn list_uploads(
    State(state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
) -> Result<Json<UploadQueryResult>, AppError> {
    let Query(query) = query.map_err(|e| {
        warn!("Invalid upload query: {}", e);
        AppError::BadRequest(e.body_text())
    })?;

    let result = state.uploads.list_uploads(query).await?;

    info!("Listed {} of {} uploads", result.uploads.len(), result.total);

    Ok(Json(result))
}

pub async fn health_check() -> &'static str {
    "OK"
}
