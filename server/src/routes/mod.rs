//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The studio page is static and talks to this server only for the AI
//! collaborators. All API routes sit under `/api/lineage`, with open CORS so
//! the page can be served from any origin.

pub mod genealogy;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Request-body ceiling for document scans. Base64 inflates a photo by a
/// third, so this admits images up to about 15 MB.
pub const DOCUMENT_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/lineage/parse", post(genealogy::parse))
        .route(
            "/api/lineage/document",
            post(genealogy::document).layer(DefaultBodyLimit::max(DOCUMENT_BODY_LIMIT)),
        )
        .route("/api/lineage/verify", post(genealogy::verify))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
