#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use nomnomchow_ai::config::OpenAiSettings;
use nomnomchow_ai::storage::LocalImageStore;
use nomnomchow_ai::{AiConfig, MealImageGenerator, OpenAiClient};
use nomnomchow_core::batch::BatchJob;
use nomnomchow_core::roles::ROLE_ADMIN;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use nomnomchow_api::auth::jwt::{generate_session_token, JwtConfig};
use nomnomchow_api::auth::session::SESSION_COOKIE;
use nomnomchow_api::config::ServerConfig;
use nomnomchow_api::router::build_app_router;
use nomnomchow_api::state::AppState;

pub const TEST_PASSWORD: &str = "test-password";

/// Build a test `ServerConfig` with safe defaults.
///
/// No AI provider is configured and the batch throttle is short so runs
/// finish quickly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        admin_password: Some(TEST_PASSWORD.to_string()),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_hours: 1,
        },
        batch_throttle: Duration::from_millis(10),
        ai: AiConfig {
            images_dir: test_images_dir(),
            ..AiConfig::from_lookup(|_| None)
        },
    }
}

pub fn test_images_dir() -> PathBuf {
    std::env::temp_dir().join("nomnomchow-api-tests")
}

/// A pool that never connects. Handlers that touch the database fail with a
/// pool timeout; everything else behaves normally.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool URL should parse")
}

/// Build [`AppState`] around `config` with no chat client and local image
/// storage.
pub fn test_state(pool: PgPool, config: ServerConfig) -> AppState {
    let images = MealImageGenerator::new(None, Arc::new(LocalImageStore::new(test_images_dir())));
    state_with_ai(pool, config, images, None)
}

pub fn state_with_ai(
    pool: PgPool,
    config: ServerConfig,
    images: MealImageGenerator,
    openai: Option<Arc<OpenAiClient>>,
) -> AppState {
    AppState {
        pool,
        batch: Arc::new(BatchJob::new(config.batch_throttle)),
        config: Arc::new(config),
        images: Arc::new(images),
        openai,
    }
}

/// State whose chat client and image generator talk to `base_url`
/// (usually a wiremock server).
pub fn configured_state(pool: PgPool, base_url: &str) -> AppState {
    let settings = OpenAiSettings {
        api_key: "sk-test".to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
        image_model: "gpt-image-1".to_string(),
        chat_model: "gpt-test".to_string(),
    };
    let client = Arc::new(OpenAiClient::with_client(reqwest::Client::new(), settings));
    let images = MealImageGenerator::new(
        Some(client.clone()),
        Arc::new(LocalImageStore::new(test_images_dir())),
    );
    state_with_ai(pool, test_config(), images, Some(client))
}

/// Build the full application router with all middleware layers.
///
/// Uses the production [`build_app_router`] so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app(state: AppState) -> Router {
    let config = state.config.clone();
    build_app_router(state, &config)
}

/// App backed by [`unreachable_pool`] and [`test_config`].
pub fn offline_app() -> Router {
    build_test_app(test_state(unreachable_pool(), test_config()))
}

/// A signed admin session token for `config`.
pub fn admin_token(config: &ServerConfig) -> String {
    generate_session_token(ROLE_ADMIN, &config.jwt)
        .expect("token generation should succeed")
        .0
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(COOKIE, format!("{SESSION_COOKIE}={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST with no body at all, as the admin panel does for buttons.
pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
