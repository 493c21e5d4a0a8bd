//! Handlers for admin login and the dashboard.
//!
//! Everything except login and logout requires [`RequireAdmin`].

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use nomnomchow_core::error::CoreError;
use nomnomchow_core::roles::ROLE_ADMIN;
use nomnomchow_db::models::meal_stats::MealStatRow;
use nomnomchow_db::repositories::{MealRepo, MealStatsRepo};
use nomnomchow_db::seed;
use serde::{Deserialize, Serialize};

use super::SuccessResponse;
use crate::auth::jwt::generate_session_token;
use crate::auth::password::verify_admin_password;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Entries per dashboard leaderboard.
const LEADERBOARD_SIZE: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_meals: i64,
    pub most_viewed: Vec<MealStatRow>,
    pub most_generated: Vec<MealStatRow>,
}

#[derive(Debug, Serialize)]
pub struct AddSamplesResponse {
    pub added: usize,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/login
///
/// Check the shared admin password and open a session cookie.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let expected = state.config.admin_password.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Configuration("Admin password not set.".into()))
    })?;

    if !verify_admin_password(&input.password, expected) {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    let (token, claims) = generate_session_token(ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    tracing::info!(jti = %claims.jti, "Admin session opened");

    let cookie = session_cookie(&token, state.config.jwt.session_secs());
    Ok(([(SET_COOKIE, cookie)], Json(SuccessResponse::ok())))
}

/// POST /api/admin/logout
///
/// Tokens are stateless, so logout only clears the cookie.
pub async fn logout() -> impl IntoResponse {
    ([(SET_COOKIE, clear_session_cookie())], Json(SuccessResponse::ok()))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AdminStats>> {
    let total_meals = MealRepo::count(&state.pool).await?;
    let most_viewed = MealStatsRepo::most_viewed(&state.pool, LEADERBOARD_SIZE).await?;
    let most_generated = MealStatsRepo::most_generated(&state.pool, LEADERBOARD_SIZE).await?;
    Ok(Json(AdminStats {
        total_meals,
        most_viewed,
        most_generated,
    }))
}

/// POST /api/admin/add-sample-meals
///
/// Insert the built-in sample meals that are not in the catalog yet.
pub async fn add_sample_meals(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AddSamplesResponse>> {
    let added = seed::add_sample_meals(&state.pool).await?;
    tracing::info!(added, "Sample meals added");
    let message = if added == 0 {
        "All sample meals are already in the catalog".to_string()
    } else {
        format!("Added {added} sample meals")
    };
    Ok(Json(AddSamplesResponse { added, message }))
}
