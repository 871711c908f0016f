//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The moments collection is served at the root: `GET/POST /` and
//! `PUT/DELETE /{id}`. Browsers call it cross-origin from the album page, so
//! every route carries a permissive CORS layer with a one-day preflight
//! cache.

pub mod moments;

use std::time::Duration;

use axum::Router;
use axum::http::{Method, StatusCode, header};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

/// Build the moments API router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(moments::list_moments).post(moments::create_moment))
        .route("/{id}", axum::routing::put(moments::update_moment).delete(moments::delete_moment))
        .route("/healthz", get(healthz))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
