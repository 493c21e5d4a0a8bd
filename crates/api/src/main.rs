use std::net::SocketAddr;
use std::sync::Arc;

use nomnomchow_ai::MealImageGenerator;
use nomnomchow_core::batch::BatchJob;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nomnomchow_api::config::ServerConfig;
use nomnomchow_api::router::build_app_router;
use nomnomchow_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nomnomchow_api=debug,nomnomchow_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        ai_enabled = config.ai.openai.is_some(),
        cloudinary = config.ai.cloudinary.is_some(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = nomnomchow_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    nomnomchow_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    nomnomchow_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    match nomnomchow_db::seed::seed_if_empty(&pool).await {
        Ok(0) => {}
        Ok(seeded) => tracing::info!(seeded, "Seeded meal catalog"),
        Err(e) => tracing::error!(error = %e, "Seeding failed"),
    }

    // --- AI clients ---
    let (images, openai) =
        MealImageGenerator::from_config(&config.ai).expect("Failed to build AI HTTP client");

    // --- Batch controller ---
    let batch = Arc::new(BatchJob::new(config.batch_throttle));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        batch: Arc::clone(&batch),
        images: Arc::new(images),
        openai,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The in-flight image is abandoned with the process; later ones never start.
    if batch.request_stop() {
        tracing::info!("Stopped running batch job");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
