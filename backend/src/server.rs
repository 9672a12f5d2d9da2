//! This module implements the server for the backend.
//! We are using Axum as the web framework.

use crate::{prediction, AppState};
use axum::{routing::post, Router};

/// Builds the application router. Split out of [`run`] so tests can drive
/// the router directly without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict_move", post(prediction::predict_move))
        .with_state(state)
}

pub async fn run(state: AppState) {
    let bind = state.config.bind.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .unwrap_or_else(|e| panic!("Could not bind to {bind}: {e}"));
    info!("Serving on {}", bind);
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
