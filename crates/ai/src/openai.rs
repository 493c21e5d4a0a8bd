//! REST client for the OpenAI-compatible provider.
//!
//! Covers the two calls the service makes: image generation
//! (`POST /images/generations`) and JSON-mode chat completion
//! (`POST /chat/completions`), using [`reqwest`].

use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::OpenAiSettings;
use crate::error::AiError;

/// Square output size requested for meal photos.
pub const IMAGE_SIZE: &str = "1024x1024";

/// HTTP client for one provider account.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    settings: OpenAiSettings,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client reusing an existing [`reqwest::Client`] (which
    /// carries the request timeout).
    pub fn with_client(client: reqwest::Client, settings: OpenAiSettings) -> Self {
        Self { client, settings }
    }

    pub fn chat_model(&self) -> &str {
        &self.settings.chat_model
    }

    /// Generate one image and return the decoded PNG bytes.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, AiError> {
        let mut body = json!({
            "model": self.settings.image_model,
            "prompt": prompt,
            "size": IMAGE_SIZE,
            "n": 1,
        });
        // gpt-image models always answer in base64 and reject the parameter.
        if self.settings.image_model.starts_with("dall-e") {
            body["response_format"] = json!("b64_json");
        }

        let response = self
            .client
            .post(format!("{}/images/generations", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ImageResponse = Self::parse_response(response).await?;
        let encoded = parsed
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .ok_or_else(|| AiError::Decode("Failed to generate image data".into()))?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| AiError::Decode(format!("Invalid base64 image payload: {e}")))
    }

    /// Run a JSON-mode chat completion and parse the reply.
    ///
    /// An empty reply parses as `{}`.
    pub async fn chat_json(&self, system: &str, user: &str) -> Result<Value, AiError> {
        let body = json!({
            "model": self.settings.chat_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = Self::parse_response(response).await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "{}".to_string());

        serde_json::from_str(&content)
            .map_err(|e| AiError::Decode(format!("Completion was not valid JSON: {e}")))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. 429 maps to
    /// [`AiError::RateLimited`], anything else to [`AiError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
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
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::with_client(
            reqwest::Client::new(),
            OpenAiSettings {
                api_key: "sk-test".into(),
                base_url: server.uri(),
                image_model: "gpt-image-1".into(),
                chat_model: "gpt-5.1".into(),
            },
        )
    }

    // -- images --

    #[tokio::test]
    async fn generate_image_decodes_base64_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-image-1", "size": "1024x1024" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [{ "b64_json": "aGVsbG8=" }] })),
            )
            .mount(&server)
            .await;

        let bytes = client_for(&server).generate_image("soup").await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn missing_image_data_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate_image("soup").await.unwrap_err();
        assert_matches!(err, AiError::Decode(msg) if msg.contains("Failed to generate image data"));
    }

    #[tokio::test]
    async fn status_429_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate_image("soup").await.unwrap_err();
        assert_matches!(err, AiError::RateLimited);
    }

    #[tokio::test]
    async fn other_failures_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_string("content policy"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate_image("soup").await.unwrap_err();
        assert_matches!(err, AiError::Api { status: 400, body } if body == "content policy");
    }

    // -- chat --

    #[tokio::test]
    async fn chat_json_parses_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "{\"meals\":[{\"title\":\"Tacos\"}]}" } }]
            })))
            .mount(&server)
            .await;

        let value = client_for(&server).chat_json("sys", "user").await.unwrap();
        assert_eq!(value, json!({ "meals": [{ "title": "Tacos" }] }));
    }

    #[tokio::test]
    async fn empty_completion_parses_as_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [{ "message": { "content": null } }] })),
            )
            .mount(&server)
            .await;

        let value = client_for(&server).chat_json("sys", "user").await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn non_json_completion_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [{ "message": { "content": "sorry" } }] })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).chat_json("sys", "user").await.unwrap_err();
        assert_matches!(err, AiError::Decode(_));
    }
}
