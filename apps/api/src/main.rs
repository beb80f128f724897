use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use promptdeck_api::api::{router, AppState};
use promptdeck_api::config::AppConfig;
use promptdeck_api::domain::repositories::TemplateRepository;
use promptdeck_api::domain::settings::SettingsService;
use promptdeck_api::infrastructure::providers::{build_http_client, HttpModelCatalog};
use promptdeck_api::infrastructure::repositories::{
    InMemoryTemplateRepository, PostgresTemplateRepository,
};
use promptdeck_api::infrastructure::settings::JsonFileSettingsStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration (reads .env first)
    let config = AppConfig::from_env()?;

    let repository: Arc<dyn TemplateRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database connected successfully");
            Arc::new(PostgresTemplateRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, templates are kept in memory");
            Arc::new(InMemoryTemplateRepository::new())
        }
    };

    let settings = SettingsService::load(
        Arc::new(JsonFileSettingsStore::new(config.settings_path.clone())),
        Arc::new(HttpModelCatalog::new(build_http_client()?)),
        config.env_fallbacks(),
    )
    .await?;
    tracing::info!(path = %config.settings_path.display(), "Provider settings loaded");

    let state = AppState::new(repository, Arc::new(settings), config.identity_provider());
    let app = router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
