pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/domains", get(routes::list_domains))
        .route("/api/assess/:domain", post(routes::assess))
        .route("/detect/", post(routes::detect_drainage)) // ruta del servicio original
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
