//! HTTP routes for work period endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{generate_periods, preview_period, update_period_status, WorkHandlers};

/// Creates the work router, mounted at `/api/works`.
pub fn work_routes(handlers: WorkHandlers) -> Router {
    Router::new()
        .route("/:work_id/periods/generate", post(generate_periods))
        .route("/:work_id/periods/preview", get(preview_period))
        .route("/periods/:period_id/status", patch(update_period_status))
        .with_state(handlers)
}
