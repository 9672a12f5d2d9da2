//! Serving-side inference: board in, legal move out.

use crate::{ModelError, PolicyNetwork};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{VarBuilder, VarMap};
use fianchetto::{encode_board, index_to_squares, moves::legal_move_with_squares, FEATURE_SIZE};
use shakmaty::{Chess, Move, Position};
use std::path::Path;

/// Outcome of a prediction. Both variants carry a move that is legal in the
/// queried position; the distinction records whether the model's top choice
/// survived the legality check or was silently replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// The model's highest-scoring move was legal and is returned as-is.
    Predicted(Move),
    /// The model's highest-scoring move was illegal; the first-enumerated
    /// legal move is returned instead.
    Fallback(Move),
}

impl Prediction {
    pub fn into_move(self) -> Move {
        match self {
            Prediction::Predicted(m) | Prediction::Fallback(m) => m,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Prediction::Fallback(_))
    }
}

/// A loaded policy network. Built once at startup and shared read-only by
/// every request; inference takes `&self` and mutates nothing.
pub struct Predictor {
    network: PolicyNetwork,
    device: Device,
}

impl Predictor {
    /// Creates a predictor with freshly initialized, untrained weights.
    pub fn new(device: Device) -> Result<Self, ModelError> {
        let varmap = VarMap::new();
        Self::from_varmap(varmap, device)
    }

    /// Loads persisted weights from a safetensors file.
    pub fn load(path: impl AsRef<Path>, device: Device) -> Result<Self, ModelError> {
        let mut varmap = VarMap::new();
        // The network has to be built first so the varmap knows which
        // tensors to expect from the file.
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let network = PolicyNetwork::new(vb)?;
        varmap.load(path)?;
        Ok(Predictor { network, device })
    }

    fn from_varmap(varmap: VarMap, device: Device) -> Result<Self, ModelError> {
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let network = PolicyNetwork::new(vb)?;
        Ok(Predictor { network, device })
    }

    /// Runs the network on the position and returns a legal move.
    ///
    /// The move index with the highest score is decoded into a (from, to)
    /// pair. If a legal move matches that pair it is returned as
    /// [`Prediction::Predicted`], otherwise the first-enumerated legal move
    /// is returned as [`Prediction::Fallback`]. A position without legal
    /// moves is an error.
    pub fn predict(&self, pos: &Chess) -> Result<Prediction, ModelError> {
        let features = encode_board(pos.board());
        let input = Tensor::from_slice(&features, (1, FEATURE_SIZE), &self.device)?;
        let logits = self.network.forward(&input)?;
        let scores = candle_nn::ops::softmax(&logits, D::Minus1)?;
        let index = scores.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;
        select_move(pos, index as u16)
    }
}

/// Resolves a predicted move index against the legal moves of a position.
pub fn select_move(pos: &Chess, index: u16) -> Result<Prediction, ModelError> {
    let (from, to) = index_to_squares(index);
    if let Some(m) = legal_move_with_squares(pos, from, to) {
        return Ok(Prediction::Predicted(m));
    }
    let fallback = pos
        .legal_moves()
        .into_iter()
        .next()
        .ok_or(ModelError::NoLegalMoves)?;
    Ok(Prediction::Fallback(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fianchetto::fen::parse_fen;
    use shakmaty::Square;

    #[test]
    fn legal_index_is_returned_as_predicted() {
        let pos = Chess::default();
        let index = Square::E2 as u16 * 64 + Square::E4 as u16;
        let prediction = select_move(&pos, index).unwrap();
        assert!(!prediction.is_fallback());
        let m = prediction.into_move();
        assert_eq!(m.from(), Some(Square::E2));
        assert_eq!(m.to(), Square::E4);
    }

    #[test]
    fn illegal_index_falls_back_to_a_legal_move() {
        let pos = Chess::default();
        // a1 to h8 is nobody's move in the starting position.
        let index = Square::A1 as u16 * 64 + Square::H8 as u16;
        let prediction = select_move(&pos, index).unwrap();
        assert!(prediction.is_fallback());
        let m = prediction.into_move();
        assert!(pos.legal_moves().contains(&m));
    }

    #[test]
    fn every_index_yields_a_legal_move_on_the_start_position() {
        let pos = Chess::default();
        let legal = pos.legal_moves();
        for index in 0..fianchetto::MOVE_INDEX_COUNT as u16 {
            let m = select_move(&pos, index).unwrap().into_move();
            assert!(legal.contains(&m), "index {} produced illegal move", index);
        }
    }

    #[test]
    fn checkmate_has_no_move_to_offer() {
        // Fool's mate: white is checkmated and has no legal moves.
        let pos = parse_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(matches!(
            select_move(&pos, 0),
            Err(ModelError::NoLegalMoves)
        ));
    }

    #[test]
    fn untrained_predictor_still_returns_a_legal_move() {
        let predictor = Predictor::new(Device::Cpu).unwrap();
        let pos = Chess::default();
        let prediction = predictor.predict(&pos).unwrap();
        assert!(pos.legal_moves().contains(&prediction.into_move()));
    }
}
