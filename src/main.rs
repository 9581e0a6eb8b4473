mod api;
mod audio;
mod auth;
mod config;
mod db;
mod emotion;
mod ml;
mod mood;
mod nlp;
mod sentiment;
mod suggestions;
mod themes;
mod users;
mod wellness;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::SETTINGS;
use crate::ml::SidecarClient;
use crate::nlp::Analyzer;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::create_journal,
        api::list_journal,
        api::get_journal,
        api::upload_audio,
        api::api_health
    ),
    components(
        schemas(
            api::CreateJournalRequest,
            api::JournalEntry,
            api::JournalEntryResponse,
            api::JournalListResponse,
            api::AudioEntryResponse,
            api::ApiError,
            api::HealthResponse,
            api::NlpModels,
            crate::nlp::AnalysisResult,
            crate::nlp::AnalysisMetadata,
            crate::nlp::ModelsUsed,
            crate::sentiment::SentimentResult,
            crate::sentiment::SentimentLabel,
            crate::emotion::EmotionResult,
            crate::emotion::Emotion,
            crate::users::User,
            crate::users::CreateUserRequest,
            crate::wellness::Quote
        )
    ),
    tags(
        (name = "journal", description = "Journal entries with emotional analysis"),
        (name = "audio", description = "Audio journal uploads"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&SETTINGS.database_url)
        .await?;

    db::init_db(&pool).await?;

    let sidecar = SETTINGS.ml_sidecar_url.as_deref().map(SidecarClient::new);
    match &sidecar {
        Some(client) => println!("🧠 ML sidecar configured at {}", client.base_url()),
        None => println!("🧠 No ML sidecar configured. Using builtin classifiers."),
    }

    let state = Arc::new(api::AppState {
        pool,
        analyzer: Analyzer::from_settings(&SETTINGS),
        sidecar,
    });

    let origins: Vec<HeaderValue> = SETTINGS
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/healthz", get(api::healthz))
        .route("/api/health", get(api::api_health))
        .route("/api/journal", post(api::create_journal).get(api::list_journal))
        .route("/api/journal/:entry_id", get(api::get_journal))
        .route("/api/audio", post(api::upload_audio))
        .route("/api/users", post(users::create_user))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/wellness/quote", get(wellness::get_quote))
        .nest_service("/", ServeDir::new("static")) // Serve auth page + dashboard
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", SETTINGS.api_host, SETTINGS.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
