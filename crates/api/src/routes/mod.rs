pub mod admin;
pub mod affiliate;
pub mod ai;
pub mod drafts;
pub mod health;
pub mod meals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /meals                                 list (public), create (admin)
/// /meals/{id}                            get (public), update, delete (admin)
///
/// /ai/generate                           recipe guide (POST)
/// /ai/suggest                            ingredient suggestions (POST)
///
/// /admin/login                           open session (public)
/// /admin/logout                          clear session (public)
/// /admin/stats                           dashboard counters
/// /admin/add-sample-meals                add built-in samples (POST)
/// /admin/generate-meal-image             single image (POST)
/// /admin/image-stats                     image coverage
/// /admin/batch-generate-images           start batch run (POST)
/// /admin/batch-progress                  batch snapshot
/// /admin/stop-batch                      stop batch run (POST)
///
/// /drafts                                submit (public), list pending (admin)
/// /drafts/{id}/approve                   approve (admin, POST)
/// /drafts/{id}/reject                    reject (admin, POST)
///
/// /affiliate/tools                       list tools
/// /affiliate/tools/{bundle}              tools in a bundle
/// /affiliate/click                       record click (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/meals", meals::router())
        .nest("/ai", ai::router())
        .nest("/admin", admin::router())
        .nest("/drafts", drafts::router())
        .nest("/affiliate", affiliate::router())
}
