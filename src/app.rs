use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::record::Dataset;
use crate::reports;

/// Shared, read-only state handed to every handler
///
/// The dataset is never mutated after load, so no lock is needed.
pub struct AppState {
    dataset: Dataset,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        AppState { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

/// Build the dashboard router: the page, static assets and one JSON
/// endpoint per report
pub fn router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/overview", get(overview))
        .route("/api/team_performance", get(team_performance))
        .route("/api/win_percentage", get(win_percentage))
        .route("/api/toss_impact", get(toss_impact))
        .route("/api/venue_stats", get(venue_stats))
        .route("/api/win_method", get(win_method))
        .route("/api/margin_distribution", get(margin_distribution))
        .route("/api/player_of_match", get(player_of_match))
        .route("/api/toss_decision", get(toss_decision))
        .route("/api/match_timeline", get(match_timeline))
        .route("/api/head_to_head", get(head_to_head))
        .route("/api/recent_matches", get(recent_matches))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}

/// Serve the dashboard until the process is stopped
pub async fn run(config: Config, dataset: Dataset) -> std::io::Result<()> {
    let app = router(Arc::new(AppState::new(dataset)), &config.static_dir);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn overview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/overview");
    Json(reports::overview(state.dataset()))
}

async fn team_performance(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/team_performance");
    Json(reports::team_performance(state.dataset()))
}

async fn win_percentage(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/win_percentage");
    Json(reports::win_percentage(state.dataset()))
}

async fn toss_impact(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/toss_impact");
    Json(reports::toss_impact(state.dataset()))
}

async fn venue_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/venue_stats");
    Json(reports::venue_stats(state.dataset()))
}

async fn win_method(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/win_method");
    Json(reports::win_method(state.dataset()))
}

async fn margin_distribution(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/margin_distribution");
    Json(reports::margin_distribution(state.dataset()))
}

async fn player_of_match(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/player_of_match");
    Json(reports::player_of_match(state.dataset()))
}

async fn toss_decision(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/toss_decision");
    Json(reports::toss_decision(state.dataset()))
}

async fn match_timeline(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/match_timeline");
    Json(reports::match_timeline(state.dataset()))
}

async fn head_to_head(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/head_to_head");
    Json(reports::head_to_head(state.dataset()))
}

async fn recent_matches(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("GET /api/recent_matches");
    Json(reports::recent_matches(state.dataset()))
}
