/// Errors from the AI provider and image storage layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider rejected the call with HTTP 429.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimited,

    /// A 2xx response did not carry the expected payload.
    #[error("Unexpected provider response: {0}")]
    Decode(String),

    /// No API key is configured.
    #[error("AI provider is not configured. Set AI_INTEGRATIONS_OPENAI_API_KEY.")]
    NotConfigured,

    /// Writing a generated image to disk failed.
    #[error("Image storage failed: {0}")]
    Io(#[from] std::io::Error),
}
