pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::{CorsConfig, ServerConfig};
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let timeout = Duration::from_secs(config.limits.request_timeout_secs);
    let body_limit = config.limits.max_body_bytes;
    let cors = cors_layer(&config.cors);
    let state = AppState::new(config);

    let game_routes = Router::new()
        .route("/new", post(api::new_game))
        .route("/moves", post(api::get_moves))
        .route("/move", post(api::make_move))
        .route("/ai-move", post(api::ai_move))
        .route("/skip", post(api::skip_turn))
        .route("/end", post(api::end_game));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/track", get(api::get_track))
        .nest("/api/game", game_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeout,
                ))
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state.clone());

    (app, state)
}

/// Any origin when none are configured, otherwise just the listed ones.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
