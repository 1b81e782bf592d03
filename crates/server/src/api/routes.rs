use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, providers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Providers
        .route("/providers", get(providers::list_providers))
        .route("/providers/{name}/settings", get(providers::get_settings))
        .route("/providers/{name}/search", post(providers::search))
        .route(
            "/providers/{name}/smart-search",
            post(providers::smart_search),
        )
        .route("/providers/{name}/latest", get(providers::latest))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
