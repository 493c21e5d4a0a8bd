//! Repository for the `meal_stats` table.

use nomnomchow_core::types::DbId;
use sqlx::PgPool;

use crate::models::meal_stats::{MealStatRow, MealStats};

const COLUMNS: &str = "id, meal_id, views, ai_generations, image_generations";

/// Counter updates and leaderboards for meal engagement.
pub struct MealStatsRepo;

impl MealStatsRepo {
    pub async fn find_by_meal(pool: &PgPool, meal_id: DbId) -> Result<Option<MealStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meal_stats WHERE meal_id = $1");
        sqlx::query_as::<_, MealStats>(&query)
            .bind(meal_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_views(pool: &PgPool, meal_id: DbId) -> Result<(), sqlx::Error> {
        increment(pool, meal_id, Counter::Views).await
    }

    pub async fn increment_ai_generations(pool: &PgPool, meal_id: DbId) -> Result<(), sqlx::Error> {
        increment(pool, meal_id, Counter::AiGenerations).await
    }

    pub async fn increment_image_generations(
        pool: &PgPool,
        meal_id: DbId,
    ) -> Result<(), sqlx::Error> {
        increment(pool, meal_id, Counter::ImageGenerations).await
    }

    /// Top `limit` meals by views.
    pub async fn most_viewed(pool: &PgPool, limit: i64) -> Result<Vec<MealStatRow>, sqlx::Error> {
        leaderboard(pool, Counter::Views, limit).await
    }

    /// Top `limit` meals by AI recipe generations.
    pub async fn most_generated(pool: &PgPool, limit: i64) -> Result<Vec<MealStatRow>, sqlx::Error> {
        leaderboard(pool, Counter::AiGenerations, limit).await
    }
}

#[derive(Debug, Clone, Copy)]
enum Counter {
    Views,
    AiGenerations,
    ImageGenerations,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::AiGenerations => "ai_generations",
            Counter::ImageGenerations => "image_generations",
        }
    }
}

/// Bump one counter, creating the stats row if the meal predates it.
async fn increment(pool: &PgPool, meal_id: DbId, counter: Counter) -> Result<(), sqlx::Error> {
    let column = counter.column();
    let query = format!(
        "INSERT INTO meal_stats (meal_id, {column}) VALUES ($1, 1)
         ON CONFLICT ON CONSTRAINT uq_meal_stats_meal_id
         DO UPDATE SET {column} = meal_stats.{column} + 1"
    );
    sqlx::query(&query).bind(meal_id).execute(pool).await?;
    Ok(())
}

async fn leaderboard(
    pool: &PgPool,
    counter: Counter,
    limit: i64,
) -> Result<Vec<MealStatRow>, sqlx::Error> {
    let column = counter.column();
    let query = format!(
        "SELECT s.meal_id, m.title, s.views, s.ai_generations
         FROM meal_stats s
         LEFT JOIN meals m ON m.id = s.meal_id
         ORDER BY s.{column} DESC, s.meal_id
         LIMIT $1"
    );
    sqlx::query_as::<_, MealStatRow>(&query)
        .bind(limit)
        .fetch_all(pool)
        .await
}
