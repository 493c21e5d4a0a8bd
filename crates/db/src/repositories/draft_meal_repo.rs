//! Repository for the `draft_meals` table.

use nomnomchow_core::draft::DRAFT_STATUS_PENDING;
use nomnomchow_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::draft_meal::{CreateDraftMeal, DraftMeal};

const COLUMNS: &str = "id, title, ingredients, suggested_by_ingredients, status, created_at";

/// Provides operations for user-submitted meal drafts.
pub struct DraftMealRepo;

impl DraftMealRepo {
    /// Insert a new draft in `pending` status.
    pub async fn create(pool: &PgPool, input: &CreateDraftMeal) -> Result<DraftMeal, sqlx::Error> {
        let query = format!(
            "INSERT INTO draft_meals (title, ingredients, suggested_by_ingredients)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DraftMeal>(&query)
            .bind(&input.title)
            .bind(input.ingredients.as_ref().map(Json))
            .bind(input.suggested_by_ingredients)
            .fetch_one(pool)
            .await
    }

    /// Drafts awaiting review, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<DraftMeal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM draft_meals WHERE status = $1 ORDER BY id");
        sqlx::query_as::<_, DraftMeal>(&query)
            .bind(DRAFT_STATUS_PENDING)
            .fetch_all(pool)
            .await
    }

    /// Set a draft's status. Returns `None` if the draft does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<DraftMeal>, sqlx::Error> {
        let query = format!("UPDATE draft_meals SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, DraftMeal>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
