//! Request-level tests for the prediction API. The router is driven directly
//! through tower's oneshot, so no socket is bound and no model file is read;
//! an untrained predictor is enough because the handler guarantees a legal
//! move regardless of what the network prefers.

use crate::{config::EnvironmentConfig, server, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use candle_core::Device;
use fianchetto_model::Predictor;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn test_state() -> AppState {
    AppState {
        config: EnvironmentConfig::default(),
        predictor: Arc::new(Predictor::new(Device::Cpu).unwrap()),
    }
}

async fn post_predict_move(body: Value) -> (StatusCode, Value) {
    let app = server::build_router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/predict_move")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn missing_fen_returns_the_documented_error() {
    let (status, body) = post_predict_move(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "FEN string is required" }));
}

#[tokio::test]
async fn empty_fen_returns_the_documented_error() {
    let (status, body) = post_predict_move(json!({ "fen": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "FEN string is required" }));
}

#[tokio::test]
async fn malformed_fen_is_a_client_error() {
    let (status, body) = post_predict_move(json!({ "fen": "not a position" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("FEN"));
}

#[tokio::test]
async fn start_position_yields_a_legal_opening_move() {
    use shakmaty::{uci::UciMove, Chess, Position};

    let (status, body) = post_predict_move(json!({ "fen": START_FEN })).await;
    assert_eq!(status, StatusCode::OK);

    let uci = body["move"].as_str().expect("response has a move field");
    let pos = Chess::default();
    let parsed: UciMove = uci.parse().expect("move is valid UCI");
    let m = parsed.to_move(&pos).expect("move is legal in the position");
    assert!(pos.legal_moves().contains(&m));
}

#[tokio::test]
async fn checkmate_position_cannot_produce_a_move() {
    // Fool's mate, white to move and mated.
    let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    let (status, body) = post_predict_move(json!({ "fen": fen })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no legal moves"));
}
