//! Handlers for user-submitted meal drafts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nomnomchow_core::draft::{DRAFT_STATUS_APPROVED, DRAFT_STATUS_REJECTED};
use nomnomchow_core::error::CoreError;
use nomnomchow_core::types::DbId;
use nomnomchow_db::models::draft_meal::{CreateDraftMeal, DraftMeal};
use nomnomchow_db::repositories::DraftMealRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// POST /api/drafts
///
/// Public: drafts come from the "what's in my fridge" flow.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateDraftMeal>,
) -> AppResult<(StatusCode, Json<DraftMeal>)> {
    input.validate()?;
    let draft = DraftMealRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /api/drafts
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<DraftMeal>>> {
    Ok(Json(DraftMealRepo::list_pending(&state.pool).await?))
}

/// POST /api/drafts/{id}/approve
///
/// Marks the draft approved. Turning it into a catalog meal is done by an
/// admin through the regular meal editor.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DraftMeal>> {
    set_status(&state, id, DRAFT_STATUS_APPROVED).await
}

/// POST /api/drafts/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DraftMeal>> {
    set_status(&state, id, DRAFT_STATUS_REJECTED).await
}

async fn set_status(state: &AppState, id: DbId, status: &str) -> AppResult<Json<DraftMeal>> {
    let draft = DraftMealRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Draft meal",
            id,
        }))?;
    tracing::info!(draft_id = id, status, "Draft reviewed");
    Ok(Json(draft))
}
