//! Model listing against mocked provider APIs

use promptdeck_api::domain::settings::{
    EnvFallbacks, ModelCatalog, ProviderId, SettingsError, SettingsService,
};
use promptdeck_api::infrastructure::providers::{build_http_client, HttpModelCatalog};
use promptdeck_api::infrastructure::settings::InMemorySettingsStore;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog() -> HttpModelCatalog {
    HttpModelCatalog::new(build_http_client().unwrap())
}

fn google_models() -> serde_json::Value {
    json!({
        "models": [
            {
                "name": "models/gemini-1.5-pro",
                "displayName": "Gemini 1.5 Pro",
                "description": "Mid-size multimodal model"
            },
            { "name": "models/embedding-001", "displayName": "Embedding 001" },
            { "name": "models/gemini-1.5-flash" }
        ]
    })
}

#[tokio::test]
async fn google_lists_gemini_models_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_models()))
        .expect(1)
        .mount(&server)
        .await;

    let models = catalog()
        .list_models(ProviderId::Google, "g-key", &server.uri())
        .await
        .unwrap();

    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gemini-1.5-pro", "gemini-1.5-flash"]);
    assert_eq!(models[0].name, "Gemini 1.5 Pro");
    assert_eq!(models[1].name, "gemini-1.5-flash");
}

#[tokio::test]
async fn openrouter_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer or-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "openai/gpt-4o", "name": "GPT-4o" },
                { "id": "meta-llama/llama-3-70b" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Trailing slash on the base URL is tolerated
    let base_url = format!("{}/", server.uri());
    let models = catalog()
        .list_models(ProviderId::OpenRouter, "or-key", &base_url)
        .await
        .unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4o");
    assert_eq!(models[0].name, "GPT-4o");
    assert_eq!(models[1].name, "meta-llama/llama-3-70b");
}

#[tokio::test]
async fn upstream_error_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid. Please pass a valid API key." }
        })))
        .mount(&server)
        .await;

    let err = catalog()
        .list_models(ProviderId::Google, "nope", &server.uri())
        .await
        .unwrap_err();

    assert_eq!(err.message, "API key not valid. Please pass a valid API key.");
}

#[tokio::test]
async fn status_is_reported_without_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = catalog()
        .list_models(ProviderId::OpenRouter, "or-key", &server.uri())
        .await
        .unwrap_err();

    assert_eq!(err.message, "Failed to fetch models: 503");
}

#[tokio::test]
async fn empty_key_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = catalog()
        .list_models(ProviderId::Google, "", &server.uri())
        .await
        .unwrap_err();

    assert_eq!(err.message, "API Key is required");
}

#[tokio::test]
async fn invalid_key_keeps_cached_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("key", "good-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_models()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("key", "bad-key"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "API key not valid. Please pass a valid API key." }
        })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemorySettingsStore::new());
    let service = SettingsService::load(store.clone(), Arc::new(catalog()), EnvFallbacks::default())
        .await
        .unwrap();

    service
        .set_credentials(ProviderId::Google, Some("good-key".to_string()), Some(server.uri()))
        .await
        .unwrap();
    let models = service.refresh_models(ProviderId::Google).await.unwrap();
    assert_eq!(models.len(), 2);

    let settings = service.snapshot().await;
    assert_eq!(settings.selected_model_for(ProviderId::Google), Some("gemini-1.5-pro"));

    service
        .set_credentials(ProviderId::Google, Some("bad-key".to_string()), None)
        .await
        .unwrap();
    let err = service.refresh_models(ProviderId::Google).await.unwrap_err();
    assert!(matches!(err, SettingsError::Upstream(_)));

    let settings = service.snapshot().await;
    assert_eq!(
        settings.error(),
        Some("API key not valid. Please pass a valid API key.")
    );
    assert!(!settings.is_loading_models());
    assert_eq!(settings.models_for(ProviderId::Google), models.as_slice());
    assert_eq!(store.current().await.cached_models[&ProviderId::Google], models);
}

#[tokio::test]
async fn environment_key_is_used_when_none_stored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("key", "env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_models()))
        .expect(1)
        .mount(&server)
        .await;

    let service = SettingsService::load(
        Arc::new(InMemorySettingsStore::new()),
        Arc::new(catalog()),
        EnvFallbacks::default().with_api_key(ProviderId::Google, "env-key"),
    )
    .await
    .unwrap();
    service
        .set_credentials(ProviderId::Google, None, Some(server.uri()))
        .await
        .unwrap();

    let models = service.refresh_models(ProviderId::Google).await.unwrap();
    assert_eq!(models.len(), 2);
}
