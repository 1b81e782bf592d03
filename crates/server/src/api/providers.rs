//! Provider API handlers.

use std::sync::Arc;
use std::time::Instant;

use anitorrent_core::{
    AnimeTorrent, ProviderError, ProviderSettings, SearchOutcome, SearchRequest, SourceFailure,
    TorrentProvider,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProviderSummary {
    pub name: String,
    pub settings: ProviderSettings,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderSummary>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub provider: String,
    pub torrents: Vec<AnimeTorrent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_errors: Vec<SourceFailure>,
    pub duration_ms: u64,
}

impl SearchResponse {
    fn new(provider: &str, outcome: SearchOutcome, start: Instant) -> Self {
        Self {
            provider: provider.to_string(),
            torrents: outcome.torrents,
            source_errors: outcome.source_errors,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: ProviderError) -> ApiError {
    let status = match e {
        ProviderError::NotFound(_) => StatusCode::NOT_FOUND,
        ProviderError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
        ProviderError::AlreadyRegistered(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn find_provider(state: &AppState, name: &str) -> Result<Arc<dyn TorrentProvider>, ApiError> {
    state.registry().require(name).map_err(error_response)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/providers
///
/// List registered providers with their capabilities.
pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    let providers = state
        .registry()
        .settings()
        .into_iter()
        .map(|(name, settings)| ProviderSummary { name, settings })
        .collect();

    Json(ProvidersResponse { providers })
}

/// GET /api/v1/providers/{name}/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProviderSettings>, ApiError> {
    let provider = find_provider(&state, &name)?;
    Ok(Json(provider.settings()))
}

/// POST /api/v1/providers/{name}/search
///
/// Plain search. Upstream failures show up in `source_errors`, never as an HTTP error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let provider = find_provider(&state, &name)?;
    let start = Instant::now();

    let outcome = provider.search(&request).await;
    debug!(
        provider = %name,
        query = %request.query,
        results = outcome.torrents.len(),
        "Search complete"
    );

    Ok(Json(SearchResponse::new(&name, outcome, start)))
}

/// POST /api/v1/providers/{name}/smart-search
pub async fn smart_search(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let provider = find_provider(&state, &name)?;
    let start = Instant::now();

    let outcome = provider
        .smart_search(&request)
        .await
        .map_err(error_response)?;

    Ok(Json(SearchResponse::new(&name, outcome, start)))
}

/// GET /api/v1/providers/{name}/latest
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let provider = find_provider(&state, &name)?;
    let start = Instant::now();

    let outcome = provider.latest().await.map_err(error_response)?;

    Ok(Json(SearchResponse::new(&name, outcome, start)))
}
