use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the OpenAI-compatible provider.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-5.1";
pub const DEFAULT_IMAGES_DIR: &str = "client/public/generated/meals";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Credentials and model names for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub image_model: String,
    pub chat_model: String,
}

/// Cloudinary account used for image uploads.
#[derive(Debug, Clone)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// AI integration configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// `None` disables every AI feature.
    pub openai: Option<OpenAiSettings>,
    /// `None` stores images on local disk instead.
    pub cloudinary: Option<CloudinarySettings>,
    /// Directory for locally stored images.
    pub images_dir: PathBuf,
    /// Upper bound for a single provider call.
    pub request_timeout: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                            | Default                          |
    /// |------------------------------------|----------------------------------|
    /// | `AI_INTEGRATIONS_OPENAI_API_KEY`   | unset (AI disabled)              |
    /// | `AI_INTEGRATIONS_OPENAI_BASE_URL`  | `https://api.openai.com/v1`      |
    /// | `OPENAI_IMAGE_MODEL`               | `gpt-image-1`                    |
    /// | `OPENAI_CHAT_MODEL`                | `gpt-5.1`                        |
    /// | `CLOUDINARY_CLOUD_NAME`            | unset (local storage)            |
    /// | `CLOUDINARY_API_KEY`               | unset                            |
    /// | `CLOUDINARY_API_SECRET`            | unset                            |
    /// | `GENERATED_IMAGES_DIR`             | `client/public/generated/meals`  |
    /// | `AI_REQUEST_TIMEOUT_SECS`          | `120`                            |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai = var("AI_INTEGRATIONS_OPENAI_API_KEY").map(|api_key| OpenAiSettings {
            api_key,
            base_url: var("AI_INTEGRATIONS_OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            image_model: var("OPENAI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into()),
            chat_model: var("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.into()),
        });

        let cloudinary = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinarySettings {
                cloud_name,
                api_key,
                api_secret,
            }),
            (Some(_), _, _) => {
                tracing::warn!(
                    "CLOUDINARY_CLOUD_NAME is set without API credentials, using local storage"
                );
                None
            }
            _ => None,
        };

        let request_timeout_secs: u64 = var("AI_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            openai,
            cloudinary,
            images_dir: PathBuf::from(
                var("GENERATED_IMAGES_DIR").unwrap_or_else(|| DEFAULT_IMAGES_DIR.into()),
            ),
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AiConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_any_variables() {
        let config = config_from(&[]);
        assert!(config.openai.is_none());
        assert!(config.cloudinary.is_none());
        assert_eq!(config.images_dir, PathBuf::from(DEFAULT_IMAGES_DIR));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn api_key_enables_provider_with_default_models() {
        let config = config_from(&[
            ("AI_INTEGRATIONS_OPENAI_API_KEY", "sk-test"),
            ("AI_INTEGRATIONS_OPENAI_BASE_URL", "http://proxy.local/v1/"),
        ]);
        let openai = config.openai.expect("provider should be enabled");
        assert_eq!(openai.base_url, "http://proxy.local/v1");
        assert_eq!(openai.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(openai.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("AI_INTEGRATIONS_OPENAI_API_KEY", "  ")]);
        assert!(config.openai.is_none());
    }

    #[test]
    fn partial_cloudinary_credentials_fall_back_to_local() {
        let config = config_from(&[("CLOUDINARY_CLOUD_NAME", "demo")]);
        assert!(config.cloudinary.is_none());

        let config = config_from(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
        ]);
        assert_eq!(config.cloudinary.map(|c| c.cloud_name).as_deref(), Some("demo"));
    }
}
