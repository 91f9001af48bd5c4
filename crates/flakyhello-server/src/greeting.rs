//! Root endpoint: greet, or fail on purpose.

use std::time::Instant;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use flakyhello_core::outcome::Outcome;

use crate::{app_state::AppState, error::ApiError};

pub const GREETING: &str = "Hello, World!";

pub async fn hello(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let path = uri.path();
    tracing::info!("Handling request to {} with method {}", path, method);

    match state.outcomes().draw() {
        Outcome::SimulatedFailure => {
            let err = ApiError::SimulatedFailure;
            tracing::error!("{}", err.message());

            let elapsed = start.elapsed();
            state
                .metrics()
                .record(method.as_str(), path, err.status().as_u16(), elapsed);
            tracing::info!(
                "Request handled in {:.6} seconds, status: {}",
                elapsed.as_secs_f64(),
                err.status().as_u16()
            );
            Err(err)
        }
        Outcome::Success => {
            let elapsed = start.elapsed();
            state
                .metrics()
                .record(method.as_str(), path, StatusCode::OK.as_u16(), elapsed);
            tracing::info!(
                "Request handled in {:.6} seconds, response: {}",
                elapsed.as_secs_f64(),
                GREETING
            );
            Ok((StatusCode::OK, GREETING).into_response())
        }
    }
}
