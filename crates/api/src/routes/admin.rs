//! Route definitions for the `/admin` panel.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, images};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /login                  -> login
/// POST /logout                 -> logout
/// GET  /stats                  -> stats
/// POST /add-sample-meals       -> add_sample_meals
/// POST /generate-meal-image    -> generate_meal_image
/// GET  /image-stats            -> image_stats
/// POST /batch-generate-images  -> batch_generate_images
/// GET  /batch-progress         -> batch_progress
/// POST /stop-batch             -> stop_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/stats", get(admin::stats))
        .route("/add-sample-meals", post(admin::add_sample_meals))
        .route("/generate-meal-image", post(images::generate_meal_image))
        .route("/image-stats", get(images::image_stats))
        .route("/batch-generate-images", post(images::batch_generate_images))
        .route("/batch-progress", get(images::batch_progress))
        .route("/stop-batch", post(images::stop_batch))
}
