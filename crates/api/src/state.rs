use std::sync::Arc;

use nomnomchow_ai::{MealImageGenerator, OpenAiClient};
use nomnomchow_core::batch::BatchJob;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: nomnomchow_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// The single batch image controller (one run at a time per process).
    pub batch: Arc<BatchJob>,
    /// Meal photo generation and storage.
    pub images: Arc<MealImageGenerator>,
    /// Chat provider for recipe guides and suggestions; `None` when no API
    /// key is configured.
    pub openai: Option<Arc<OpenAiClient>>,
}
