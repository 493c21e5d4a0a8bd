//! Meal entity model and DTOs.
//!
//! Rows serialize in camelCase because the JSON contract with the web client
//! predates this service.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use nomnomchow_core::types::{DbId, Timestamp};
use validator::Validate;

/// Upper bound for `time_minutes` (one day).
pub const MAX_TIME_MINUTES: i32 = 1440;

/// A kitchen product suggested alongside a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmazonRecommendation {
    pub title: String,
    pub category: String,
    pub asin: Option<String>,
    pub search_query: String,
    pub affiliate_url: Option<String>,
    pub why_this_helps: String,
}

/// A meal row from the `meals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
    pub time_minutes: i32,
    pub age_ranges: Option<Json<Vec<String>>>,
    pub dietary_flags: Option<Json<Vec<String>>>,
    pub image_url: Option<String>,
    pub ingredients: Option<Json<Vec<String>>>,
    pub instructions: Option<Json<Vec<String>>>,
    pub kid_friendly_notes: Option<String>,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub tags: Option<Json<Vec<String>>>,
    pub amazon_recommendations: Option<Json<Vec<AmazonRecommendation>>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new meal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeal {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
    #[validate(range(min = 1, max = MAX_TIME_MINUTES))]
    pub time_minutes: i32,
    pub age_ranges: Option<Vec<String>>,
    pub dietary_flags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub kid_friendly_notes: Option<String>,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub amazon_recommendations: Option<Vec<AmazonRecommendation>>,
}

/// DTO for updating an existing meal. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeal {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
    #[validate(range(min = 1, max = MAX_TIME_MINUTES))]
    pub time_minutes: Option<i32>,
    pub age_ranges: Option<Vec<String>>,
    pub dietary_flags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub kid_friendly_notes: Option<String>,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub amazon_recommendations: Option<Vec<AmazonRecommendation>>,
}

/// Which meals a batch image run should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSelection {
    /// Exactly these meals (missing ids are skipped).
    Ids(Vec<DbId>),
    /// Every meal in the catalog.
    All,
    /// Meals whose `image_url` is null or blank.
    MissingOnly,
}

/// The columns an image generation needs.
#[derive(Debug, Clone, FromRow)]
pub struct MealImageTarget {
    pub id: DbId,
    pub title: String,
    pub ingredients: Option<Json<Vec<String>>>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
}

/// Catalog-wide image coverage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ImageCounts {
    pub total: i64,
    pub with_images: i64,
}
