//! Handlers for AI recipe guides and ingredient-based suggestions.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use nomnomchow_ai::{AiError, OpenAiClient};
use nomnomchow_core::error::CoreError;
use nomnomchow_core::prompts::{
    extract_suggestions, recipe_guide_prompt, suggestion_prompt, RECIPE_SYSTEM_PROMPT,
    SUGGEST_SYSTEM_PROMPT,
};
use nomnomchow_core::types::DbId;
use nomnomchow_db::models::generated_recipe::CreateGeneratedRecipe;
use nomnomchow_db::repositories::{GeneratedRecipeRepo, MealRepo, MealStatsRepo};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Age range used when the request leaves it out.
const DEFAULT_AGE_RANGE: &str = "2-13";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/ai/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipeRequest {
    pub meal_id: DbId,
    pub age_range: Option<String>,
    #[serde(default)]
    pub dietary_filters: Vec<String>,
}

/// Request body for `POST /api/ai/suggest`.
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub ingredients: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/ai/generate
///
/// Produce a kid-friendly cooking guide for a catalog meal. The guide is
/// stored in `generated_recipes` and the meal's AI counter is bumped; both
/// writes are best effort.
pub async fn generate_recipe(
    State(state): State<AppState>,
    AppJson(input): AppJson<GenerateRecipeRequest>,
) -> AppResult<Json<Value>> {
    let client = chat_client(&state)?;
    let meal = MealRepo::find_by_id(&state.pool, input.meal_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meal",
            id: input.meal_id,
        }))?;

    if let Err(e) = MealStatsRepo::increment_ai_generations(&state.pool, meal.id).await {
        tracing::warn!(meal_id = meal.id, error = %e, "Failed to record AI generation");
    }

    let age_range = input
        .age_range
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(DEFAULT_AGE_RANGE);
    let prompt = recipe_guide_prompt(&meal.title, age_range, &input.dietary_filters);

    let guide = client
        .chat_json(RECIPE_SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| upstream_error(e, "AI generation failed"))?;

    let record = CreateGeneratedRecipe {
        meal_id: Some(meal.id),
        input_filters_json: Some(json!({
            "ageRange": age_range,
            "dietaryFilters": input.dietary_filters,
        })),
        output_json: guide.clone(),
    };
    if let Err(e) = GeneratedRecipeRepo::create(&state.pool, &record).await {
        tracing::warn!(meal_id = meal.id, error = %e, "Failed to store generated recipe");
    }

    Ok(Json(guide))
}

/// POST /api/ai/suggest
///
/// Suggest meal ideas from a list of ingredients.
pub async fn suggest(
    State(state): State<AppState>,
    AppJson(input): AppJson<SuggestRequest>,
) -> AppResult<Json<Vec<Value>>> {
    let ingredients: Vec<String> = input
        .ingredients
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one ingredient is required".into(),
        )));
    }

    let client = chat_client(&state)?;
    let content = client
        .chat_json(SUGGEST_SYSTEM_PROMPT, &suggestion_prompt(&ingredients))
        .await
        .map_err(|e| upstream_error(e, "Failed to suggest meals"))?;

    Ok(Json(extract_suggestions(content)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chat_client(state: &AppState) -> AppResult<Arc<OpenAiClient>> {
    state
        .openai
        .clone()
        .ok_or_else(|| AppError::BadRequest(AiError::NotConfigured.to_string()))
}

/// Keep rate limiting visible to the client; hide everything else behind
/// `message`.
fn upstream_error(err: AiError, message: &str) -> AppError {
    match err {
        AiError::RateLimited => AppError::from(err),
        other => {
            tracing::error!(error = %other, "AI provider call failed");
            AppError::Upstream(message.to_string())
        }
    }
}
