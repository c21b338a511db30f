//! Shared-secret guard for the admin routes.
//!
//! When `ADMIN_TOKEN` is configured every request must carry it in the
//! `x-admin-token` header. With no token configured the check is disabled,
//! which is only acceptable for local development.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use galleria_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub async fn require_admin_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    if let Some(expected) = &state.config.admin_token {
        let provided = request
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(HttpAppError(AppError::Unauthorized(
                "Invalid or missing admin token".to_string(),
            )));
        }
    }
    Ok(next.run(request).await)
}
