//! Where generated images end up.
//!
//! [`CloudinaryStore`] uploads to a Cloudinary folder; [`LocalImageStore`]
//! writes PNG files under a directory the HTTP server exposes at
//! `/generated/meals`.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine as _;
use rand::distr::{Alphanumeric, SampleString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinarySettings;
use crate::error::AiError;

/// Cloudinary folder generated meal photos are uploaded into.
pub const CLOUDINARY_FOLDER: &str = "nomnomchow/meals";

/// URL prefix the API serves local images under.
pub const LOCAL_PUBLIC_PREFIX: &str = "/generated/meals";

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Persists a PNG and returns the URL clients should use for it.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, png: Vec<u8>) -> Result<String, AiError>;

    /// Whether images leave the host (reported on the admin dashboard).
    fn is_cloud(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Local disk
// ---------------------------------------------------------------------------

/// Writes images as `<millis>-<random>.png` under `dir`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

fn local_file_name() -> String {
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), 7)
        .to_lowercase();
    format!("{}-{suffix}.png", chrono::Utc::now().timestamp_millis())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, png: Vec<u8>) -> Result<String, AiError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = local_file_name();
        tokio::fs::write(self.dir.join(&file_name), png).await?;
        tracing::debug!(file = %file_name, "Stored generated image on disk");
        Ok(format!("{LOCAL_PUBLIC_PREFIX}/{file_name}"))
    }

    fn is_cloud(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Cloudinary
// ---------------------------------------------------------------------------

/// Signed uploads to a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    settings: CloudinarySettings,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

impl CloudinaryStore {
    pub fn new(client: reqwest::Client, settings: CloudinarySettings) -> Self {
        Self {
            client,
            settings,
            api_base: CLOUDINARY_API_BASE.to_string(),
        }
    }

    /// Point uploads at a different host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, suffixed with the secret, SHA-256 hex digest.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    hex::encode(digest)
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn store(&self, png: Vec<u8>) -> Result<String, AiError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", CLOUDINARY_FOLDER), ("timestamp", &timestamp)],
            &self.settings.api_secret,
        );
        let data_uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );

        let form = reqwest::multipart::Form::new()
            .text("file", data_uri)
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", CLOUDINARY_FOLDER)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(format!(
                "{}/v1_1/{}/image/upload",
                self.api_base, self.settings.cloud_name
            ))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadResponse>()
            .await?
            .secure_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AiError::Decode("Cloudinary response had no secure_url".into()))
    }

    fn is_cloud(&self) -> bool {
        true
    }
}
