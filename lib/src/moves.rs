//! Maps a move to the index which represents it in the policy vector.
//!
//! The policy vector has 64 * 64 = 4096 entries, one per (from, to) square
//! pair. The index of a move is `from * 64 + to`.
//!
//! This encoding is lossy on purpose: promotion choices, en passant and
//! castling flags all collapse onto the same (from, to) pair. Decoding an
//! index therefore recovers the square pair exactly, but not the full move.
//! Castling uses shakmaty's king-square/rook-square convention, consistently
//! on the encoding and decoding side.

use shakmaty::{Chess, Move, Position, Square};

/// Size of the policy vector: one entry per (from, to) square pair.
pub const MOVE_INDEX_COUNT: usize = 64 * 64;

/// Maps a move to its policy vector index.
///
/// Drop moves have no origin square and cannot occur in standard chess, so
/// they map to the degenerate `0 * 64 + to` entry rather than forcing an
/// error onto every caller.
pub fn move_to_index(m: &Move) -> u16 {
    let from = m.from().map(|sq| sq as u16).unwrap_or(0);
    let to = m.to() as u16;
    from * 64 + to
}

/// Decodes a policy vector index back into its (from, to) square pair.
///
/// Never fails for indices below [`MOVE_INDEX_COUNT`]: every such index
/// yields two valid squares, even though the pair may not form a legal move
/// on any given board.
pub fn index_to_squares(index: u16) -> (Square, Square) {
    debug_assert!((index as usize) < MOVE_INDEX_COUNT);
    let from = Square::new(u32::from(index) / 64);
    let to = Square::new(u32::from(index) % 64);
    (from, to)
}

/// Finds the legal move matching the given square pair, if any.
///
/// A move only matches if it carries no promotion flag. The policy index of a
/// promotion collapses onto the plain (from, to) pair, and treating that pair
/// as "promote to something" would invent information the model never had.
/// Positions where promotion is forced simply produce no match.
pub fn legal_move_with_squares(pos: &Chess, from: Square, to: Square) -> Option<Move> {
    pos.legal_moves()
        .into_iter()
        .find(|m| m.from() == Some(from) && m.to() == to && m.promotion().is_none())
}
