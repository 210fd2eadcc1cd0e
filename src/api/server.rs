//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use super::models::{ErrorBody, SummaryQuery};
use crate::config::Config;
use crate::error::SummaryError;
use crate::summary::SummaryService;
use crate::youtube::FeedReader;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summaries: Arc<SummaryService>,
    pub feed: Arc<FeedReader>,
}

/// Build the application with routes and middleware
pub fn build_router(app_state: AppState) -> Router {
    // Browser clients call from the public site's origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/channel-stats", get(channel_stats_handler))
        .route("/api/summary/:video_id", get(summary_handler))
        .route("/api/video/:video_id", get(video_handler))
        .route("/api/cache", get(cache_list_handler))
        .route("/api/episodes", get(episodes_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(app_state: AppState) -> Result<()> {
    let address = format!("{}:{}", app_state.config.server.host, app_state.config.server.port);
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::health_check(state.summaries.generator()))
}

/// Channel statistics handler
async fn channel_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::channel_stats(state.summaries.scraper()).await)
}

/// Summary handler
async fn summary_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Response {
    match handlers::get_summary(&state.summaries, &video_id, query.force_refresh()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => summary_error_response(e),
    }
}

/// Video metadata handler
async fn video_handler(State(state): State<AppState>, Path(video_id): Path<String>) -> Response {
    match handlers::get_video(&state.summaries, &video_id).await {
        Ok(video) => (StatusCode::OK, Json(video)).into_response(),
        Err(e) => video_error_response(e),
    }
}

/// Cache listing handler
async fn cache_list_handler(State(state): State<AppState>) -> Response {
    match handlers::list_cached_summaries(state.summaries.cache()).await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(e.to_string()))).into_response(),
    }
}

/// Episode feed handler
async fn episodes_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::latest_episodes(&state.feed).await)
}

fn summary_error_response(e: SummaryError) -> Response {
    let (status, body) = match &e {
        SummaryError::InvalidVideoId(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::with_message("Invalid video id", e.to_string()),
        ),
        SummaryError::VideoUnavailable(_) => (
            StatusCode::NOT_FOUND,
            ErrorBody::with_message("Could not fetch video data", "Video not found or inaccessible"),
        ),
        SummaryError::ProvidersFailed { .. } | SummaryError::InvalidResponse(_) | SummaryError::Cache(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::with_message("Failed to generate summary", e.to_string()),
        ),
    };
    (status, Json(body)).into_response()
}

fn video_error_response(e: SummaryError) -> Response {
    let (status, body) = match &e {
        SummaryError::InvalidVideoId(_) => (StatusCode::BAD_REQUEST, ErrorBody::new("Invalid video id")),
        SummaryError::VideoUnavailable(_) => (StatusCode::NOT_FOUND, ErrorBody::new("Video not found")),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(e.to_string())),
    };
    (status, Json(body)).into_response()
}
