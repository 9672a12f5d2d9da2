//! FEN parsing helper.
//!
//! The actual notation handling lives in shakmaty; this module only narrows
//! its error types down to [`FianchettoError`] so callers get one uniform
//! "your FEN is bad" error regardless of whether the string failed to parse
//! or described an unreachable position.

use crate::FianchettoError;
use shakmaty::{fen::Fen, CastlingMode, Chess};

/// Parses a FEN string into a playable position.
pub fn parse_fen(input: &str) -> Result<Chess, FianchettoError> {
    let fen: Fen = input
        .parse()
        .map_err(|e| FianchettoError::InputFenMalformed(format!("{e}")))?;
    fen.into_position(CastlingMode::Standard)
        .map_err(|e| FianchettoError::InputFenMalformed(format!("{e}")))
}
