use axum::{
    routing::{get, post, put},
    Router,
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{drafts, settings, templates};
use crate::api::state::AppState;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(templates::health_check))
        // Stateless preview
        .route("/api/preview", post(templates::preview))
        // Template routes
        .route(
            "/api/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/templates/:id",
            get(templates::get_template)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/api/templates/:id/resolved", get(templates::resolved_template))
        // Draft routes
        .route("/api/drafts", post(drafts::open_draft))
        .route(
            "/api/drafts/:id",
            get(drafts::get_draft)
                .patch(drafts::edit_draft)
                .delete(drafts::close_draft),
        )
        .route("/api/drafts/:id/save", post(drafts::save_draft))
        .route("/api/drafts/:id/discard", post(drafts::discard_draft))
        // Settings routes
        .route("/api/settings", get(settings::get_settings))
        .route("/api/settings/active-provider", put(settings::set_active_provider))
        .route("/api/settings/locale", put(settings::set_locale))
        .route("/api/settings/providers/:provider", put(settings::set_credentials))
        .route("/api/settings/providers/:provider/model", put(settings::select_model))
        .route(
            "/api/settings/providers/:provider/models",
            post(settings::refresh_models),
        )
        .route("/api/locale", get(settings::get_locale))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
