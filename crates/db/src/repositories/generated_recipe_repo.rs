//! Repository for the `generated_recipes` table.

use sqlx::PgPool;

use crate::models::generated_recipe::{CreateGeneratedRecipe, GeneratedRecipe};

const COLUMNS: &str = "id, meal_id, input_filters_json, output_json, created_at";

pub struct GeneratedRecipeRepo;

impl GeneratedRecipeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneratedRecipe,
    ) -> Result<GeneratedRecipe, sqlx::Error> {
        let query = format!(
            "INSERT INTO generated_recipes (meal_id, input_filters_json, output_json)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedRecipe>(&query)
            .bind(input.meal_id)
            .bind(&input.input_filters_json)
            .bind(&input.output_json)
            .fetch_one(pool)
            .await
    }
}
