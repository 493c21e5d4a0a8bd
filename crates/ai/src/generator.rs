//! Meal photo generation: prompt, provider call, storage.

use std::sync::Arc;

use nomnomchow_core::prompts::meal_image_prompt;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::openai::OpenAiClient;
use crate::storage::{CloudinaryStore, ImageStore, LocalImageStore};

/// What the image prompt is built from.
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    pub title: String,
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
}

/// Generates a meal photo and returns the URL it was stored under.
pub struct MealImageGenerator {
    client: Option<Arc<OpenAiClient>>,
    store: Arc<dyn ImageStore>,
}

impl MealImageGenerator {
    pub fn new(client: Option<Arc<OpenAiClient>>, store: Arc<dyn ImageStore>) -> Self {
        Self { client, store }
    }

    /// Build the provider client and the configured store from `config`.
    ///
    /// Returns the shared provider client too, so chat endpoints reuse the
    /// same connection pool.
    pub fn from_config(config: &AiConfig) -> Result<(Self, Option<Arc<OpenAiClient>>), AiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let client = config
            .openai
            .clone()
            .map(|settings| Arc::new(OpenAiClient::with_client(http.clone(), settings)));

        let store: Arc<dyn ImageStore> = match &config.cloudinary {
            Some(settings) => Arc::new(CloudinaryStore::new(http, settings.clone())),
            None => Arc::new(LocalImageStore::new(config.images_dir.clone())),
        };

        Ok((Self::new(client.clone(), store), client))
    }

    /// Whether a provider API key is present.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn storage_is_cloud(&self) -> bool {
        self.store.is_cloud()
    }

    pub async fn generate(&self, request: &ImageRequest) -> Result<String, AiError> {
        let client = self.client.as_ref().ok_or(AiError::NotConfigured)?;
        let prompt = meal_image_prompt(
            &request.title,
            &request.ingredients,
            request.cuisine.as_deref(),
            request.skill_level.as_deref(),
        );
        let png = client.generate_image(&prompt).await?;
        let url = self.store.store(png).await?;
        tracing::info!(title = %request.title, url = %url, "Generated meal image");
        Ok(url)
    }
}
