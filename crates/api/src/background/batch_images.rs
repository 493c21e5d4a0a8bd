//! Batch meal image generation.
//!
//! Each item generates one photo through [`MealImageGenerator`]; each
//! success is written back to the meal row and counted in its stats before
//! the item is marked complete.

use std::sync::Arc;

use async_trait::async_trait;
use nomnomchow_ai::{ImageRequest, MealImageGenerator};
use nomnomchow_core::batch::{ItemOperation, ItemSink, WorkItem};
use nomnomchow_core::types::DbId;
use nomnomchow_db::models::meal::MealImageTarget;
use nomnomchow_db::repositories::{MealRepo, MealStatsRepo};
use sqlx::PgPool;

/// Turn selected meals into work items, keeping their order.
pub fn work_items(targets: Vec<MealImageTarget>) -> Vec<WorkItem<ImageRequest>> {
    targets
        .into_iter()
        .map(|meal| WorkItem {
            id: meal.id,
            label: meal.title.clone(),
            payload: ImageRequest {
                title: meal.title,
                ingredients: meal.ingredients.map(|json| json.0).unwrap_or_default(),
                cuisine: meal.cuisine,
                skill_level: meal.skill_level,
            },
        })
        .collect()
}

/// Generates (and stores) one meal photo, yielding its public URL.
pub struct GenerateMealImage {
    generator: Arc<MealImageGenerator>,
}

impl GenerateMealImage {
    pub fn new(generator: Arc<MealImageGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ItemOperation for GenerateMealImage {
    type Payload = ImageRequest;
    type Output = String;

    async fn execute(&self, item: &WorkItem<ImageRequest>) -> Result<String, String> {
        self.generator
            .generate(&item.payload)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Points the meal at its new image and bumps `image_generations`.
pub struct PersistMealImage {
    pool: PgPool,
}

impl PersistMealImage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemSink for PersistMealImage {
    type Output = String;

    async fn record(&self, meal_id: DbId, image_url: String) -> Result<(), String> {
        let updated = MealRepo::update_image_url(&self.pool, meal_id, &image_url)
            .await
            .map_err(|e| format!("Failed to save image URL: {e}"))?;
        if !updated {
            return Err("Meal was deleted during the run".to_string());
        }
        MealStatsRepo::increment_image_generations(&self.pool, meal_id)
            .await
            .map_err(|e| format!("Failed to update image stats: {e}"))
    }
}
