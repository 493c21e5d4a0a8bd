use axum::routing::{get, post};
use axum::Router;

use crate::handlers::affiliate;
use crate::state::AppState;

/// Routes mounted at `/affiliate`.
///
/// ```text
/// GET  /tools            -> list_tools
/// GET  /tools/{bundle}   -> list_bundle
/// POST /click            -> record_click
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools", get(affiliate::list_tools))
        .route("/tools/{bundle}", get(affiliate::list_bundle))
        .route("/click", post(affiliate::record_click))
}
