//! Board representation as a 64x12 tensor, flattened to 768 floats.
//!
//! There are 12 planes per square:
//!     (Pawn, Knight, Bishop, Rook, Queen, King) x (White, Black)
//!
//! White: 0-5
//!     Pawn: Plane 0
//!     ...
//!     King: Plane 5
//! Black: 6-11
//!
//! The flattened index of a set entry is `square * 12 + plane`, with squares
//! counted a1 = 0 up to h8 = 63. At most one plane is set per square, so a
//! regular game never has more than 32 ones in the whole vector.
//!
//! Both the dataset builder and the prediction handler go through this module.
//! The network treats the vector as an opaque numeric array, so the only thing
//! that matters is that this layout never changes between training and
//! serving.

use shakmaty::{Board, Color, Role, Square};

/// Number of entries in the flattened board tensor.
pub const FEATURE_SIZE: usize = 64 * 12;

/// Plane index within a square's 12-plane group.
fn plane(role: Role, color: Color) -> usize {
    let color_offset = match color {
        Color::White => 0,
        Color::Black => 6,
    };
    role as usize - 1 + color_offset
}

/// Fills in the tensor representation of the board.
/// Assumes that `out` is already zeroed.
pub fn board_representation(board: &Board, out: &mut [f32; FEATURE_SIZE]) {
    for square in Square::ALL {
        if let Some(piece) = board.piece_at(square) {
            out[square as usize * 12 + plane(piece.role, piece.color)] = 1.0;
        }
    }
}

/// Allocating convenience wrapper around [`board_representation`].
pub fn encode_board(board: &Board) -> [f32; FEATURE_SIZE] {
    let mut out = [0.0; FEATURE_SIZE];
    board_representation(board, &mut out);
    out
}
