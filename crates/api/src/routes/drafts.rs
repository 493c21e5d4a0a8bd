use axum::routing::post;
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

/// Routes mounted at `/drafts`.
///
/// ```text
/// POST /                -> create
/// GET  /                -> list_pending
/// POST /{id}/approve    -> approve
/// POST /{id}/reject     -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(drafts::create).get(drafts::list_pending))
        .route("/{id}/approve", post(drafts::approve))
        .route("/{id}/reject", post(drafts::reject))
}
