//! Router assembly: quiz endpoints, static pages, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - home/author/help pages
/// - quiz CRUD under `/quizzes`, single play/check and random play
/// - static files from `./public` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./public")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./public/index.html"));

    Router::new()
        .route("/", get(http::http_home))
        .route("/author", get(http::http_author))
        .route("/help", get(http::http_help))
        .route("/api/v1/health", get(http::http_health))
        // Quizzes
        .route("/quizzes", get(http::http_index).post(http::http_create))
        .route("/quizzes/new", get(http::http_new))
        .route("/quizzes/randomplay", get(http::http_random_play))
        .route(
            "/quizzes/:quiz_id",
            get(http::http_show).put(http::http_update).delete(http::http_destroy),
        )
        .route("/quizzes/:quiz_id/edit", get(http::http_edit))
        .route("/quizzes/:quiz_id/play", get(http::http_play))
        .route("/quizzes/:quiz_id/check", get(http::http_check))
        .route("/quizzes/:quiz_id/randomcheck", get(http::http_random_check))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}
