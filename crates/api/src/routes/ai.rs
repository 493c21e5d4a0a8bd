use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /generate   -> generate_recipe
/// POST /suggest    -> suggest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(ai::generate_recipe))
        .route("/suggest", post(ai::suggest))
}
