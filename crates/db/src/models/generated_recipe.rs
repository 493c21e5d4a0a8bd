//! Stored AI recipe guides.

use serde::Serialize;
use sqlx::FromRow;
use nomnomchow_core::types::{DbId, Timestamp};

/// A row from the `generated_recipes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub id: DbId,
    pub meal_id: Option<DbId>,
    pub input_filters_json: Option<serde_json::Value>,
    pub output_json: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for persisting a generated guide.
#[derive(Debug, Clone)]
pub struct CreateGeneratedRecipe {
    pub meal_id: Option<DbId>,
    pub input_filters_json: Option<serde_json::Value>,
    pub output_json: serde_json::Value,
}
