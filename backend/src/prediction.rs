//! Move prediction API.

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fianchetto::{fen::parse_fen, FianchettoError};
use fianchetto_model::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shakmaty::CastlingMode;

/// This enum holds all errors that can be returned by the API.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("FEN string is required")]
    MissingFen,
    #[error("The input FEN is malformed: {0}")]
    InvalidFen(String),
    #[error("The position has no legal moves.")]
    GameOver,
    #[error("Inference failed")]
    Inference(#[source] ModelError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::MissingFen | ServerError::InvalidFen(_) | ServerError::GameOver => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Inference(_) => {
                error!("Server Error: {:?}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ModelError> for ServerError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoLegalMoves => ServerError::GameOver,
            other => ServerError::Inference(other),
        }
    }
}

#[derive(Deserialize)]
pub struct PredictMoveRequest {
    fen: Option<String>,
}

#[derive(Serialize)]
pub struct PredictMoveResponse {
    /// The chosen move in UCI coordinate notation, e.g. "e2e4" or "e7e8q".
    #[serde(rename = "move")]
    uci: String,
}

/// Predict the next move for the given position.
///
/// The model's top-scoring move is returned when it is legal; otherwise the
/// first-enumerated legal move takes its place, so the response always
/// contains a legal move.
pub async fn predict_move(
    State(state): State<AppState>,
    Json(request): Json<PredictMoveRequest>,
) -> Result<Json<PredictMoveResponse>, ServerError> {
    let fen = match request.fen.as_deref() {
        Some(fen) if !fen.is_empty() => fen,
        _ => return Err(ServerError::MissingFen),
    };

    let pos = parse_fen(fen).map_err(|e| match e {
        FianchettoError::InputFenMalformed(reason) => ServerError::InvalidFen(reason),
        other => ServerError::InvalidFen(other.to_string()),
    })?;

    let prediction = state.predictor.predict(&pos)?;
    if prediction.is_fallback() {
        debug!("Model suggested an illegal move for {}, falling back", fen);
    }

    // parse_fen always produces standard-mode positions, so castling moves
    // render in the usual king-destination form (e1g1).
    let uci = prediction
        .into_move()
        .to_uci(CastlingMode::Standard)
        .to_string();
    Ok(Json(PredictMoveResponse { uci }))
}
