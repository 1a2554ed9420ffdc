use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    middleware::logging,
    routes::{health, sessions, stats, threads, votes},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Sessions
        .route("/sessions", post(sessions::start_session))
        .route("/sessions/:session_id", delete(sessions::end_session))
        // Threads
        .route("/threads", get(threads::list_threads))
        .route(
            "/sessions/:session_id/threads/:thread_id",
            get(threads::view_thread),
        )
        // Votes
        .route(
            "/sessions/:session_id/threads/:thread_id/posts/:post_id/votes",
            post(votes::cast_vote).delete(votes::remove_vote),
        )
        // Stats
        .route(
            "/sessions/:session_id/threads/:thread_id/posts/:post_id/stats",
            get(stats::item_stats),
        )
        .route("/stats", get(stats::global_stats));

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let parsed_origins: Vec<axum::http::HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
            .collect();

        cors.allow_origin(parsed_origins)
    }
}
