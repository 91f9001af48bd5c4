//! Axum router wiring.
//!
//! Exposes `/` (greeting) and `/metrics` (scrape). Everything else falls
//! through to axum's default 404/405 and is not recorded.

use axum::{routing::get, Router};

use crate::{app_state::AppState, greeting, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greeting::hello))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
