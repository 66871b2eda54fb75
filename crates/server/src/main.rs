use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::ApiError;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

mod api;
mod app_state;
mod config;

use api::{ApiContext, EventQuery, SearchQuery, VenueQuery};
use app_state::AppState;
use config::load_settings;

type HttpResult = Result<Json<Value>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    if settings.ticketmaster_api_key.trim().is_empty() {
        warn!("TM_API_KEY is not set; upstream requests will be rejected");
    }

    let api = ApiContext {
        http: settings.upstream_client()?,
        base_url: settings.ticketmaster_base_url.clone(),
        api_key: settings.ticketmaster_api_key.clone(),
        page_size: settings.page_size,
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, upstream = %settings.ticketmaster_base_url, "catalog proxy listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/search", get(http_search_events))
        .route("/api/event", get(http_event_details))
        .route("/api/venue", get(http_venue_search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Backend API is running",
        "endpoints": ["/api/search", "/api/event", "/api/venue", "/api/health"],
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn http_search_events(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> HttpResult {
    api::search_events(&state.api, &q)
        .await
        .map(Json)
        .map_err(|(status, e)| (status, Json(e)))
}

async fn http_event_details(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EventQuery>,
) -> HttpResult {
    api::event_details(&state.api, &q)
        .await
        .map(Json)
        .map_err(|(status, e)| (status, Json(e)))
}

async fn http_venue_search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<VenueQuery>,
) -> HttpResult {
    api::venue_search(&state.api, &q)
        .await
        .map(Json)
        .map_err(|(status, e)| (status, Json(e)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
