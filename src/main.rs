use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use menubot::config::AppConfig;
use menubot::db::{self, queries};
use menubot::handlers;
use menubot::models::ChatSession;
use menubot::services::ai::gemini::GeminiProvider;
use menubot::services::ai::ollama::OllamaProvider;
use menubot::services::ai::LlmProvider;
use menubot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!(
                "using Ollama LLM provider (url: {}, model: {})",
                config.ollama_url,
                config.ollama_model
            );
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        }
        _ => {
            anyhow::ensure!(
                !config.gemini_api_key.is_empty(),
                "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini"
            );
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Box::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))
        }
    };

    // The reference lists are fetched once at session start. A failure here
    // marks the session disconnected; chat turns short-circuit until a reset
    // succeeds.
    let valid_values = match queries::fetch_valid_values(&conn) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::error!(error = %e, "catalog unavailable at startup, session starts disconnected");
            None
        }
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        llm,
        session: tokio::sync::Mutex::new(ChatSession::new(valid_values)),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/valid-values", get(handlers::catalog::valid_values))
        .route("/api/menu-items", get(handlers::catalog::menu_items))
        .route("/api/chat/message", post(handlers::chat::send_message))
        .route("/api/chat/history", get(handlers::chat::history))
        .route("/api/chat/reset", post(handlers::chat::reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
