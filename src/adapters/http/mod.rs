//! HTTP adapters - REST API implementations.

pub mod work;

use axum::Router;

pub use work::{work_routes, WorkHandlers};

/// Top-level API router.
pub fn api_router(handlers: WorkHandlers) -> Router {
    Router::new().nest("/api/works", work_routes(handlers))
}
