//! Affiliate tool catalog and click tracking.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use nomnomchow_core::types::{DbId, Timestamp};

/// A row from the `affiliate_tools` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateTool {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub search_query: String,
    pub asin: Option<String>,
    pub benefit: String,
    pub tags: Option<Json<Vec<String>>>,
    pub is_top_pick: bool,
    pub bundle: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a click-through.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliateClick {
    pub tool_id: DbId,
    pub meal_id: Option<DbId>,
    pub page: String,
}
