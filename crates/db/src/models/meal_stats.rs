//! Per-meal engagement counters.

use serde::Serialize;
use sqlx::FromRow;
use nomnomchow_core::types::DbId;

/// A row from the `meal_stats` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStats {
    pub id: DbId,
    pub meal_id: DbId,
    pub views: i32,
    pub ai_generations: i32,
    pub image_generations: i32,
}

/// Leaderboard entry for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStatRow {
    pub meal_id: DbId,
    pub title: Option<String>,
    pub views: i32,
    pub ai_generations: i32,
}
