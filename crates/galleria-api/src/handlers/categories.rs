use std::sync::Arc;

use axum::{extract::State, Json};
use galleria_core::models::Category;

use crate::error::HttpAppError;
use crate::state::AppState;

/// List gallery categories for the category selector, ordered by name.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, HttpAppError> {
    let categories = state.categories.list().await.map_err(HttpAppError)?;
    Ok(Json(categories))
}
