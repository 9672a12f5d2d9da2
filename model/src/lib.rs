//! The policy network, its training pipeline, and the serving-side predictor.

pub mod network;
pub mod predictor;
pub mod training;

pub use network::PolicyNetwork;
pub use predictor::{Prediction, Predictor};
pub use training::{train, TrainingReport};

/// Default file name of the persisted model parameters.
pub const DEFAULT_MODEL_PATH: &str = "chess_model.safetensors";

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Tensor operation failed: {0}")]
    Candle(#[from] candle_core::Error),
    #[error("The position has no legal moves.")]
    NoLegalMoves,
    #[error("The training set is empty.")]
    EmptyTrainingSet,
}
