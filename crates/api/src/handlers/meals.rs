//! Handlers for the `/meals` catalog resource.
//!
//! Reads are public; writes require an admin session via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nomnomchow_core::error::CoreError;
use nomnomchow_core::meal::{validate_skill_level, MealFilters, MealQuery};
use nomnomchow_core::types::DbId;
use nomnomchow_db::models::meal::{CreateMeal, Meal, UpdateMeal};
use nomnomchow_db::repositories::{MealRepo, MealStatsRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// GET /api/meals
///
/// List meals matching the optional catalog filters.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MealQuery>,
) -> AppResult<Json<Vec<Meal>>> {
    let filters = MealFilters::from(query);
    let meals = MealRepo::list(&state.pool, &filters).await?;
    Ok(Json(meals))
}

/// GET /api/meals/{id}
///
/// The view counter is bumped on a detached task; failures there are only
/// logged.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Meal>> {
    let meal = MealRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Meal", id }))?;

    let pool = state.pool.clone();
    tokio::spawn(async move {
        if let Err(e) = MealStatsRepo::increment_views(&pool, id).await {
            tracing::warn!(meal_id = id, error = %e, "Failed to record meal view");
        }
    });

    Ok(Json(meal))
}

/// POST /api/meals
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<CreateMeal>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    input.validate()?;
    validate_skill_level(input.skill_level.as_deref())?;

    let meal = MealRepo::create(&state.pool, &input).await?;
    tracing::info!(meal_id = meal.id, title = %meal.title, "Meal created");
    Ok((StatusCode::CREATED, Json(meal)))
}

/// PUT /api/meals/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateMeal>,
) -> AppResult<Json<Meal>> {
    input.validate()?;
    validate_skill_level(input.skill_level.as_deref())?;

    let meal = MealRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Meal", id }))?;
    Ok(Json(meal))
}

/// DELETE /api/meals/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MealRepo::delete(&state.pool, id).await? {
        tracing::info!(meal_id = id, "Meal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Meal", id }))
    }
}
