use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use pixel_debate_shared::ANALYZE_PATH;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod analyzer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod prompt;
pub mod snapshot;
pub mod state;

use crate::handlers::{analyze_handler, method_not_allowed, ping_handler};
use crate::state::AppState;

pub fn router(state: AppState, public_dir: PathBuf, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route(
            ANALYZE_PATH,
            post(analyze_handler).fallback(method_not_allowed),
        )
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
