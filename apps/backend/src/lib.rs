pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::LanguageModel;
use crate::config::Config;
use crate::db::{Database, MemoryStore, PracticeStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PracticeStore>,
    pub model: Arc<dyn LanguageModel>,
}

/// Build the router with all routes.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Profile routes
        .route("/api/me", get(routes::users::me).patch(routes::users::update_me))
        // Vocabulary routes
        .route("/api/words", get(routes::words::list).post(routes::words::create))
        .route(
            "/api/words/:id",
            get(routes::words::get)
                .put(routes::words::update)
                .delete(routes::words::delete),
        )
        // Practice routes
        .route("/api/generate", post(routes::practice::generate))
        .route("/api/check", post(routes::practice::check))
        .route("/api/chat", post(routes::practice::chat))
        // Progress routes
        .route("/api/progress", get(routes::progress::progress))
        .route("/api/sessions", post(routes::progress::start))
        .route("/api/sessions/current", get(routes::progress::current))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn PracticeStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let model = ai::from_config(&config.ai)?;
    if model.is_remote() {
        tracing::info!(model = %config.ai.model, "Using {} language model", model.name());
    } else {
        tracing::warn!("OPENAI_API_KEY not set, using offline language model");
    }

    let app = app(AppState { store, model });

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
