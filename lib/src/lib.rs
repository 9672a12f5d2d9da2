pub mod dataset;
pub mod features;
pub mod fen;
pub mod moves;

pub use dataset::{build_dataset, load_games, RecordedGame, TrainingSet};
pub use features::{board_representation, encode_board, FEATURE_SIZE};
pub use moves::{index_to_squares, move_to_index, MOVE_INDEX_COUNT};

#[derive(thiserror::Error, Debug)]
pub enum FianchettoError {
    #[error("Could not read the PGN file: {0}")]
    PgnUnreadable(#[from] std::io::Error),
    #[error("The input FEN is malformed: {0}")]
    InputFenMalformed(String),
    #[error("The position has no legal moves.")]
    NoLegalMoves,
}
