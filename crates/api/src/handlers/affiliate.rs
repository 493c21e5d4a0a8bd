use axum::extract::{Path, State};
use axum::Json;
use nomnomchow_core::error::CoreError;
use nomnomchow_db::models::affiliate::{AffiliateTool, CreateAffiliateClick};
use nomnomchow_db::repositories::AffiliateRepo;

use super::SuccessResponse;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// GET /api/affiliate/tools
pub async fn list_tools(State(state): State<AppState>) -> AppResult<Json<Vec<AffiliateTool>>> {
    Ok(Json(AffiliateRepo::list_tools(&state.pool).await?))
}

/// GET /api/affiliate/tools/{bundle}
pub async fn list_bundle(
    State(state): State<AppState>,
    Path(bundle): Path<String>,
) -> AppResult<Json<Vec<AffiliateTool>>> {
    Ok(Json(AffiliateRepo::list_by_bundle(&state.pool, &bundle).await?))
}

/// POST /api/affiliate/click
pub async fn record_click(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAffiliateClick>,
) -> AppResult<Json<SuccessResponse>> {
    if !AffiliateRepo::record_click(&state.pool, &input).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Affiliate tool",
            id: input.tool_id,
        }));
    }
    Ok(Json(SuccessResponse::ok()))
}
