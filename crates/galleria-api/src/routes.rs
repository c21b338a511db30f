//! Router assembly.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::handlers::{categories, gallery_upload};
use crate::state::AppState;

/// Build the admin API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_file_size_bytes + 1024 * 1024;

    Router::new()
        .route("/api/admin/gallery", post(gallery_upload::upload_media))
        .route("/api/admin/categories", get(categories::list_categories))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_token,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
