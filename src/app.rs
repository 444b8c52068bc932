use crate::catalog::{CatalogFetcher, ListingRequest};
use crate::config::Config;
use crate::embed::{AvailabilityProber, EmbedTarget};
use crate::models::MediaKind;
use crate::sort::SortKey;
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogFetcher>,
    pub prober: Arc<AvailabilityProber>,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>, prober: AvailabilityProber) -> Self {
        Self {
            catalog: Arc::new(CatalogFetcher::new(tmdb)),
            prober: Arc::new(prober),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let prober = AvailabilityProber::new(&config)?;
    info!(
        "Using metadata provider {} and embed provider {}",
        config.tmdb_base_url, config.embed_base_url
    );

    let app = build_router(AppState::new(tmdb, prober));

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/availability/:kind/:id", get(availability))
        .route("/api/movie/:id", get(movie_details))
        .route("/api/tv/:id", get(series_details))
        .route("/api/tv/:id/season/:season", get(season_details))
        .route(
            "/api/tv/:id/season/:season/episode/:episode",
            get(episode_details),
        )
        .route("/api/list/:kind", get(list))
        .route("/api/genres/:kind", get(genres))
        .route("/api/sort-options/:kind", get(sort_options))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_available() -> Response {
    error_response(StatusCode::NOT_FOUND, "not available")
}

fn parse_kind(raw: &str) -> Result<MediaKind, Response> {
    raw.parse::<MediaKind>().map_err(|e| {
        debug!("Rejecting media kind: {}", e);
        error_response(StatusCode::BAD_REQUEST, "kind must be 'movie' or 'tv'")
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
    genre: Option<i64>,
    sort: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(res) => return res,
    };
    let sort = SortKey::parse_or_default(kind, params.sort.as_deref());
    let request = ListingRequest::new(kind, params.genre, sort, params.page.unwrap_or(1));
    Json(state.catalog.fetch_catalog(&request).await).into_response()
}

async fn genres(State(state): State<AppState>, Path(kind): Path<String>) -> Response {
    match parse_kind(&kind) {
        Ok(kind) => Json(state.catalog.genres(kind).await).into_response(),
        Err(res) => res,
    }
}

async fn sort_options(Path(kind): Path<String>) -> Response {
    match parse_kind(&kind) {
        Ok(kind) => Json(SortKey::options(kind)).into_response(),
        Err(res) => res,
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
    page: Option<u32>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Query parameter is required");
    };
    let page = params.page.unwrap_or(1);
    Json(state.catalog.search(&query, page).await).into_response()
}

async fn movie_details(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.catalog.movie_details(id).await {
        Some(details) => Json(details).into_response(),
        None => not_available(),
    }
}

async fn series_details(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.catalog.series_details(id).await {
        Some(details) => Json(details).into_response(),
        None => not_available(),
    }
}

async fn season_details(
    State(state): State<AppState>,
    Path((id, season)): Path<(i64, u32)>,
) -> Response {
    match state.catalog.season(id, season).await {
        Some(details) => Json(details).into_response(),
        None => not_available(),
    }
}

async fn episode_details(
    State(state): State<AppState>,
    Path((id, season, episode)): Path<(i64, u32, u32)>,
) -> Response {
    match state.catalog.episode(id, season, episode).await {
        Some(details) => Json(details).into_response(),
        None => not_available(),
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityParams {
    season: Option<u32>,
    episode: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Availability {
    available: bool,
    embed_url: String,
}

async fn availability(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(res) => return res,
    };
    let target = EmbedTarget {
        kind,
        id,
        season: params.season,
        episode: params.episode,
    };
    let available = state.prober.probe(&target).await;
    Json(Availability {
        available,
        embed_url: state.prober.embed_url(&target),
    })
    .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
