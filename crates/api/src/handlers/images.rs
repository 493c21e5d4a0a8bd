//! Handlers for meal image generation: single images, coverage stats and
//! the batch job.
//!
//! All handlers require [`RequireAdmin`].

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use nomnomchow_ai::{AiError, ImageRequest};
use nomnomchow_core::batch::{BatchFailure, BatchProgress, RUN_IN_PROGRESS};
use nomnomchow_core::error::CoreError;
use nomnomchow_core::types::DbId;
use nomnomchow_db::models::meal::ImageSelection;
use nomnomchow_db::repositories::{MealRepo, MealStatsRepo};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::background::batch_images::{work_items, GenerateMealImage, PersistMealImage};
use crate::error::{AppError, AppResult};
use crate::extract::{json_or_default, AppJson};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

pub const IMAGE_GENERATION_NOT_CONFIGURED: &str =
    "Image generation is not configured. Set AI_INTEGRATIONS_OPENAI_API_KEY.";

pub const NO_MEALS_NEED_IMAGES: &str = "No meals need images";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/admin/generate-meal-image`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    /// When present, the new image is saved on this meal.
    pub meal_id: Option<DbId>,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total_meals: i64,
    pub with_images: i64,
    pub without_images: i64,
    pub cloudinary_configured: bool,
}

/// Request body for `POST /api/admin/batch-generate-images`. The body may
/// be omitted entirely.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGenerateRequest {
    /// Include meals that already have an image.
    #[serde(default)]
    pub regenerate: bool,
    /// Restrict the run to these meals.
    pub meal_ids: Option<Vec<DbId>>,
}

impl BatchGenerateRequest {
    fn selection(self) -> ImageSelection {
        match self.meal_ids {
            Some(ids) if !ids.is_empty() => ImageSelection::Ids(ids),
            _ if self.regenerate => ImageSelection::All,
            _ => ImageSelection::MissingOnly,
        }
    }
}

/// Batch progress in the shape the admin dashboard polls for.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgressResponse {
    pub current: usize,
    pub total: usize,
    pub current_meal_title: String,
    pub completed: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailureResponse>,
    pub is_running: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailureResponse {
    pub meal_id: DbId,
    pub title: String,
    pub error: String,
}

impl From<BatchFailure> for BatchFailureResponse {
    fn from(failure: BatchFailure) -> Self {
        Self {
            meal_id: failure.item_id,
            title: failure.label,
            error: failure.error,
        }
    }
}

impl From<BatchProgress> for BatchProgressResponse {
    fn from(progress: BatchProgress) -> Self {
        Self {
            current: progress.current,
            total: progress.total,
            current_meal_title: progress.current_item_label,
            completed: progress.completed,
            failed: progress.failed,
            failures: progress.failures.into_iter().map(Into::into).collect(),
            is_running: progress.is_running,
        }
    }
}

// ---------------------------------------------------------------------------
// Single image
// ---------------------------------------------------------------------------

/// POST /api/admin/generate-meal-image
///
/// Generate one image. Provider failures other than rate limiting are
/// reported in the body (`success: false`) so the editor can show them
/// inline.
pub async fn generate_meal_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<GenerateImageRequest>,
) -> AppResult<Json<GenerateImageResponse>> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required".into(),
        )));
    }
    if !state.images.is_configured() {
        return Err(AppError::BadRequest(IMAGE_GENERATION_NOT_CONFIGURED.into()));
    }

    let request = ImageRequest {
        title: input.title,
        ingredients: input.ingredients,
        cuisine: input.cuisine,
        skill_level: input.skill_level,
    };

    let image_url = match state.images.generate(&request).await {
        Ok(url) => url,
        Err(AiError::RateLimited) => return Err(AppError::from(AiError::RateLimited)),
        Err(e) => {
            tracing::warn!(title = %request.title, error = %e, "Image generation failed");
            return Ok(Json(GenerateImageResponse {
                success: false,
                image_url: String::new(),
                error: Some(e.to_string()),
            }));
        }
    };

    if let Some(meal_id) = input.meal_id {
        if !MealRepo::update_image_url(&state.pool, meal_id, &image_url).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Meal",
                id: meal_id,
            }));
        }
        MealStatsRepo::increment_image_generations(&state.pool, meal_id).await?;
    }

    Ok(Json(GenerateImageResponse {
        success: true,
        image_url,
        error: None,
    }))
}

/// GET /api/admin/image-stats
pub async fn image_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ImageStats>> {
    let counts = MealRepo::image_counts(&state.pool).await?;
    Ok(Json(ImageStats {
        total_meals: counts.total,
        with_images: counts.with_images,
        without_images: counts.total - counts.with_images,
        cloudinary_configured: state.images.storage_is_cloud(),
    }))
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// POST /api/admin/batch-generate-images
///
/// Select meals and start a background run. Returns as soon as the run is
/// claimed; progress is read from `GET /api/admin/batch-progress`.
pub async fn batch_generate_images(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    body: Bytes,
) -> AppResult<Json<MessageResponse>> {
    let input: BatchGenerateRequest = json_or_default(&body)?;

    if !state.images.is_configured() {
        return Err(AppError::BadRequest(IMAGE_GENERATION_NOT_CONFIGURED.into()));
    }
    // Checked again atomically when the run is claimed; this avoids the
    // meal query when the answer is already known.
    if state.batch.is_running() {
        return Err(AppError::Core(CoreError::Conflict(RUN_IN_PROGRESS.into())));
    }

    let selection = input.selection();
    let targets = MealRepo::list_for_images(&state.pool, &selection).await?;
    if targets.is_empty() {
        return Ok(Json(MessageResponse::new(NO_MEALS_NEED_IMAGES)));
    }

    let total = targets.len();
    state.batch.spawn_run(
        work_items(targets),
        GenerateMealImage::new(state.images.clone()),
        PersistMealImage::new(state.pool.clone()),
    )?;
    tracing::info!(total, ?selection, "Batch image generation started");

    Ok(Json(MessageResponse::new(format!(
        "Started generating images for {total} meals"
    ))))
}

/// GET /api/admin/batch-progress
pub async fn batch_progress(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<BatchProgressResponse> {
    Json(state.batch.progress().into())
}

/// POST /api/admin/stop-batch
///
/// The in-flight image finishes; no further image starts.
pub async fn stop_batch(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<MessageResponse> {
    let was_running = state.batch.request_stop();
    if was_running {
        tracing::info!("Batch stop requested");
        Json(MessageResponse::new(
            "Stopping batch after the current meal",
        ))
    } else {
        Json(MessageResponse::new("No batch is running"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(regenerate: bool, meal_ids: Option<Vec<DbId>>) -> BatchGenerateRequest {
        BatchGenerateRequest {
            regenerate,
            meal_ids,
        }
    }

    #[test]
    fn explicit_ids_take_precedence() {
        assert_eq!(
            request(true, Some(vec![4, 2])).selection(),
            ImageSelection::Ids(vec![4, 2])
        );
    }

    #[test]
    fn regenerate_selects_everything() {
        assert_eq!(request(true, None).selection(), ImageSelection::All);
    }

    #[test]
    fn default_selects_missing_images() {
        assert_eq!(request(false, None).selection(), ImageSelection::MissingOnly);
        assert_eq!(
            request(false, Some(Vec::new())).selection(),
            ImageSelection::MissingOnly
        );
    }

    #[test]
    fn progress_maps_to_dashboard_shape() {
        let progress = BatchProgress {
            current: 2,
            total: 3,
            current_item_label: "Tacos".into(),
            completed: 1,
            failed: 1,
            failures: vec![BatchFailure {
                item_id: 7,
                label: "Soup".into(),
                error: "boom".into(),
            }],
            is_running: true,
        };

        let json = serde_json::to_value(BatchProgressResponse::from(progress)).unwrap();
        assert_eq!(json["currentMealTitle"], "Tacos");
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["failures"][0]["mealId"], 7);
        assert_eq!(json["failures"][0]["title"], "Soup");
        assert_eq!(json["failures"][0]["error"], "boom");
    }
}
