//! SkillJudge - Application Entry Point
//!
//! This is the main entry point for the SkillJudge server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skilljudge::{
    config::Config,
    constants::MAX_UPLOAD_BYTES,
    db,
    evaluation::{evaluators::AppPrototypeEvaluator, EvaluatorRegistry, VisionClient},
    handlers,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SkillJudge server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Register built-in evaluation strategies
    let registry = EvaluatorRegistry::new();
    match VisionClient::from_config(&config.ai) {
        Some(vision) => {
            let vision = Arc::new(vision);
            for module_id in &config.ai.app_prototype_modules {
                registry.register(
                    module_id,
                    Arc::new(AppPrototypeEvaluator::new(vision.clone())),
                );
            }
        }
        None => {
            if config.ai.app_prototype_modules.is_empty() {
                tracing::info!("AI evaluation disabled (AI_BASE_URL not set)");
            } else {
                tracing::warn!(
                    "AI_APP_PROTOTYPE_MODULES set but AI_BASE_URL missing; no evaluators registered"
                );
            }
        }
    }

    // Create application state
    let state = AppState::new(db_pool, config.clone(), registry);

    // Build the router
    let app = Router::new()
        .nest("/api/v1", handlers::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
