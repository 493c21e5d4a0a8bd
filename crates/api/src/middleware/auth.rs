//! Admin session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nomnomchow_core::error::CoreError;
use nomnomchow_core::roles::ROLE_ADMIN;

use crate::auth::jwt::{validate_token, Claims};
use crate::auth::session::token_from_headers;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a valid admin session, from the `nnc_admin` cookie or a Bearer
/// token.
///
/// Rejects with 500 while `ADMIN_PASSWORD` is unset (no session can be
/// legitimate then) and with 401 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(_claims): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.admin_password.is_none() {
            return Err(AppError::Core(CoreError::Configuration(
                "Admin password not set.".into(),
            )));
        }

        let unauthorized = || AppError::Core(CoreError::Unauthorized("Unauthorized".into()));

        let token = token_from_headers(&parts.headers).ok_or_else(unauthorized)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|_| unauthorized())?;
        if claims.role != ROLE_ADMIN {
            return Err(unauthorized());
        }
        Ok(RequireAdmin(claims))
    }
}
