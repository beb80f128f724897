use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::auth::CurrentUser;
use crate::api::state::AppState;
use crate::domain::settings::{Locale, ModelInfo, ProviderId, ProviderSettings};

/// Cookie read on first render to pick the interface language
pub const LOCALE_COOKIE: &str = "locale";
const LOCALE_COOKIE_MAX_AGE_SECS: i64 = 31_536_000;
/// Keys this short are never hinted at, not even partially
const MIN_HINTED_KEY_CHARS: usize = 9;

/// Per-provider view; the API key itself is never echoed back
#[derive(Debug, Serialize)]
pub struct ProviderView {
    pub id: ProviderId,
    pub name: &'static str,
    pub default_base_url: &'static str,
    pub base_url: String,
    pub has_api_key: bool,
    pub api_key_hint: Option<String>,
    pub selected_model: Option<String>,
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub active_provider: ProviderId,
    pub locale: Locale,
    pub providers: Vec<ProviderView>,
    pub is_loading_models: bool,
    pub error: Option<String>,
}

impl From<&ProviderSettings> for SettingsResponse {
    fn from(settings: &ProviderSettings) -> Self {
        let providers = ProviderId::ALL
            .iter()
            .map(|&id| {
                let provider = id.provider();
                ProviderView {
                    id,
                    name: provider.name,
                    default_base_url: provider.default_base_url,
                    base_url: settings.base_url_for(id).to_string(),
                    has_api_key: settings.api_key_for(id).is_some(),
                    api_key_hint: settings.api_key_for(id).and_then(mask_key),
                    selected_model: settings.selected_model_for(id).map(str::to_string),
                    models: settings.models_for(id).to_vec(),
                }
            })
            .collect();

        Self {
            active_provider: settings.active_provider(),
            locale: settings.locale(),
            providers,
            is_loading_models: settings.is_loading_models(),
            error: settings.error().map(str::to_string),
        }
    }
}

/// Keeps the last four characters of a key; short keys get no hint
fn mask_key(key: &str) -> Option<String> {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < MIN_HINTED_KEY_CHARS {
        return None;
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("****{}", visible))
}

#[derive(Debug, Deserialize)]
pub struct ActiveProviderRequest {
    pub provider: ProviderId,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LocaleRequest {
    pub locale: Locale,
}

#[derive(Debug, Serialize)]
pub struct LocaleResponse {
    pub locale: Locale,
}

fn parse_provider(raw: &str) -> Result<ProviderId, ApiError> {
    raw.parse().map_err(ApiError::not_found)
}

/// Current provider settings
///
/// GET /api/settings
pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Json<SettingsResponse> {
    let settings = state.settings.snapshot().await;
    Json(SettingsResponse::from(&settings))
}

/// Switch the active provider
///
/// PUT /api/settings/active-provider
pub async fn set_active_provider(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(req): Json<ActiveProviderRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state.settings.set_active_provider(req.provider).await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Store API key and base URL for a provider
///
/// Saving a non-empty key refreshes that provider's model list; a failed
/// refresh is reported in the returned settings' `error`.
///
/// PUT /api/settings/providers/:provider
pub async fn set_credentials(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(provider): Path<String>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let provider = parse_provider(&provider)?;
    let refresh = req.api_key.as_deref().is_some_and(|k| !k.is_empty());

    let mut settings = state
        .settings
        .set_credentials(provider, req.api_key, req.base_url)
        .await?;

    if refresh {
        if let Err(e) = state.settings.refresh_models(provider).await {
            tracing::warn!(provider = %provider, error = %e, "Model refresh after saving credentials failed");
        }
        settings = state.settings.snapshot().await;
    }

    Ok(Json(SettingsResponse::from(&settings)))
}

/// Select the model to use for a provider
///
/// PUT /api/settings/providers/:provider/model
pub async fn select_model(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(provider): Path<String>,
    Json(req): Json<SelectModelRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let provider = parse_provider(&provider)?;
    let settings = state
        .settings
        .set_selected_model(provider, req.model_id)
        .await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Fetch and cache a provider's model list
///
/// POST /api/settings/providers/:provider/models
pub async fn refresh_models(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(provider): Path<String>,
) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    let provider = parse_provider(&provider)?;
    let models = state.settings.refresh_models(provider).await?;
    Ok(Json(models))
}

/// Locale for the first render: the `locale` cookie, else the default
///
/// Needs no identity; only the caller's own cookie is read.
///
/// GET /api/locale
pub async fn get_locale(jar: CookieJar) -> Json<LocaleResponse> {
    let locale = jar
        .get(LOCALE_COOKIE)
        .and_then(|c| c.value().parse().ok())
        .unwrap_or_default();
    Json(LocaleResponse { locale })
}

/// Persist the locale and mirror it into the `locale` cookie
///
/// PUT /api/settings/locale
pub async fn set_locale(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    jar: CookieJar,
    Json(req): Json<LocaleRequest>,
) -> Result<(CookieJar, Json<SettingsResponse>), ApiError> {
    let settings = state.settings.set_locale(req.locale).await?;

    let cookie = Cookie::build((LOCALE_COOKIE, req.locale.as_str()))
        .path("/")
        .max_age(time::Duration::seconds(LOCALE_COOKIE_MAX_AGE_SECS));

    Ok((jar.add(cookie), Json(SettingsResponse::from(&settings))))
}
