//! Draft meal entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use nomnomchow_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `draft_meals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMeal {
    pub id: DbId,
    pub title: String,
    pub ingredients: Option<Json<Vec<String>>>,
    pub suggested_by_ingredients: bool,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for submitting a draft.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftMeal {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub suggested_by_ingredients: bool,
}
