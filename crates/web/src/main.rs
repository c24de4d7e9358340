use std::sync::Arc;

use anyhow::Context;
use assistant::Assistant;
use axum::Router;
use storage::{Database, MemoryStore, PgStore, Store};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::{Config, StorageBackend};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::sync_user,
        features::users::handlers::get_user,
        features::impact::handlers::log_activity,
        features::impact::handlers::list_metrics,
        features::impact::handlers::summary,
        features::challenges::handlers::create_challenge,
        features::challenges::handlers::active_challenges,
        features::challenges::handlers::get_challenge,
        features::challenges::handlers::user_challenges,
        features::challenges::handlers::join_challenge,
        features::challenges::handlers::record_progress,
        features::challenges::handlers::complete_challenge,
        features::leaderboard::handlers::get_leaderboard,
        features::community::handlers::post_message,
        features::community::handlers::list_messages,
        features::assistant::handlers::chat,
        features::assistant::handlers::recommendations,
        features::assistant::handlers::waste_scan,
    ),
    components(
        schemas(
            storage::dto::user::SyncUserRequest,
            storage::dto::impact::LogImpactRequest,
            storage::dto::impact::ActivityLoggedResponse,
            storage::dto::challenge::CreateChallengeRequest,
            storage::dto::challenge::JoinChallengeRequest,
            storage::dto::challenge::ChallengeProgressRequest,
            storage::dto::challenge::CompleteChallengeRequest,
            storage::dto::challenge::ChallengeResponse,
            storage::dto::challenge::ProgressResponse,
            storage::dto::challenge::CompletionResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::message::PostMessageRequest,
            storage::models::User,
            storage::models::Category,
            storage::models::ImpactMetric,
            storage::models::Challenge,
            storage::models::ChallengeMetrics,
            storage::models::ChallengeStatus,
            storage::models::ChatMessage,
            storage::services::scoring::CategoryTotals,
            storage::services::scoring::Equivalents,
            storage::services::scoring::ImpactSummary,
            assistant::ChatTurn,
            assistant::ChatReply,
            assistant::Goal,
            assistant::Recommendations,
            assistant::WasteScan,
            features::assistant::handlers::ChatRequest,
            features::assistant::handlers::RecommendationRequest,
        )
    ),
    tags(
        (name = "users", description = "User profile endpoints"),
        (name = "impact", description = "Activity logging and impact summaries"),
        (name = "challenges", description = "Gamified challenge endpoints"),
        (name = "leaderboard", description = "Public ranking endpoints"),
        (name = "community", description = "Community chat endpoints"),
        (name = "assistant", description = "AI coach endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            tracing::info!(
                "Connecting to database at: {}",
                config
                    .database_url
                    .split('@')
                    .next_back()
                    .unwrap_or("unknown")
            );
            let db = Database::new(&config.database_url)
                .await
                .context("Failed to initialize database")?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations");
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database migrations completed successfully");

            Ok(Arc::new(PgStore::new(db.pool().clone())))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting EcoTrack API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store = build_store(&config).await?;

    let assistant = Arc::new(Assistant::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    if assistant.is_ready() {
        tracing::info!("Assistant configured with model {}", config.openai_model);
    }

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API keys configured; mutating endpoints are open");
    }

    let state = AppState::new(store, assistant, api_keys);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/users", features::users::routes::routes(state.clone()))
        .nest("/api/impact", features::impact::routes::routes(state.clone()))
        .nest(
            "/api/challenges",
            features::challenges::routes::routes(state.clone()),
        )
        .nest("/api/leaderboard", features::leaderboard::routes::routes())
        .nest(
            "/api/messages",
            features::community::routes::routes(state.clone()),
        )
        .nest(
            "/api/assistant",
            features::assistant::routes::routes(state.clone()),
        )
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
