//! Route definitions for the `/meals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::meals;
use crate::state::AppState;

/// Routes mounted at `/meals`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(meals::list).post(meals::create))
        .route(
            "/{id}",
            get(meals::get_by_id).put(meals::update).delete(meals::delete),
        )
}
