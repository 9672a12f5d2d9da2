//! PGN game loading and training set construction.
//!
//! Loading and replaying are split: [`load_games`] only records the mainline
//! SAN moves of each game, [`build_dataset`] replays them against a fresh
//! board and emits one (features, label) example per ply. The board state is
//! encoded *before* the move is played, so example `i` always shows the
//! position after the first `i - 1` moves. The final position of a game has
//! no following move and contributes nothing.

use crate::{board_representation, move_to_index, FianchettoError, FEATURE_SIZE};
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Position};
use std::fs::File;
use std::path::Path;

/// One game as read from a PGN file: the mainline moves in SAN, in order.
/// The starting position is always the standard one.
#[derive(Debug, Clone, Default)]
pub struct RecordedGame {
    pub sans: Vec<SanPlus>,
}

impl RecordedGame {
    pub fn plies(&self) -> usize {
        self.sans.len()
    }
}

/// The full training set, stored flat so it can be handed to the tensor
/// library without another copy. `features` has `len * FEATURE_SIZE` entries,
/// `labels` has `len` entries.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub features: Vec<f32>,
    pub labels: Vec<u32>,
}

impl TrainingSet {
    /// Number of (position, move) examples in the set.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, pos: &Chess, san: &SanPlus) -> Option<shakmaty::Move> {
        // The source format is trusted, so a SAN that does not resolve only
        // happens on corrupt input.
        let m = san.san.to_move(pos).ok()?;
        let mut features = [0.0; FEATURE_SIZE];
        board_representation(pos.board(), &mut features);
        self.features.extend_from_slice(&features);
        self.labels.push(u32::from(move_to_index(&m)));
        Some(m)
    }
}

/// Collects the mainline SAN moves of every game in a PGN stream.
struct GameCollector {
    games: Vec<RecordedGame>,
    current: RecordedGame,
}

impl GameCollector {
    fn new() -> Self {
        GameCollector {
            games: Vec::new(),
            current: RecordedGame::default(),
        }
    }
}

impl Visitor for GameCollector {
    type Result = ();

    fn begin_game(&mut self) {
        self.current = RecordedGame::default();
    }

    fn header(&mut self, _key: &[u8], _value: RawHeader<'_>) {}

    fn end_headers(&mut self) -> Skip {
        Skip(false)
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.current.sans.push(san_plus);
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        self.games.push(std::mem::take(&mut self.current));
    }
}

/// Reads zero or more games from a PGN file, in file order.
pub fn load_games(path: impl AsRef<Path>) -> Result<Vec<RecordedGame>, FianchettoError> {
    let file = File::open(path)?;
    read_games(file)
}

/// Reads games from any PGN byte stream. Useful for tests and for callers
/// that already hold the data in memory.
pub fn read_games(input: impl std::io::Read) -> Result<Vec<RecordedGame>, FianchettoError> {
    let mut reader = BufferedReader::new(input);
    let mut collector = GameCollector::new();
    while reader.read_game(&mut collector)?.is_some() {}
    Ok(collector.games)
}

/// Replays every game from the standard starting position and produces one
/// training example per ply.
///
/// Returns the training set together with the number of plies that had to be
/// dropped because a recorded move did not resolve to a legal move.
pub fn build_dataset(games: &[RecordedGame]) -> (TrainingSet, usize) {
    let mut set = TrainingSet::default();
    let mut dropped = 0;

    for game in games {
        let mut pos = Chess::default();
        for (ply, san) in game.sans.iter().enumerate() {
            match set.push(&pos, san) {
                Some(m) => pos.play_unchecked(&m),
                None => {
                    dropped += game.sans.len() - ply;
                    break;
                }
            }
        }
    }

    (set, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_board, index_to_squares};
    use shakmaty::Square;

    const SHORT_GAME: &str = "\
[Event \"Test\"]
[Result \"1-0\"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0
";

    #[test]
    fn loads_games_in_file_order() {
        let pgn = format!("{SHORT_GAME}\n{SHORT_GAME}");
        let games = read_games(pgn.as_bytes()).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].plies(), 6);
        assert_eq!(games[1].plies(), 6);
    }

    #[test]
    fn empty_input_yields_no_games() {
        let games = read_games(&b""[..]).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn variations_are_skipped() {
        let pgn = "1. e4 (1. d4 d5) 1... e5 2. Nf3 *\n";
        let games = read_games(pgn.as_bytes()).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].plies(), 3);
    }

    #[test]
    fn one_example_per_ply() {
        let games = read_games(SHORT_GAME.as_bytes()).unwrap();
        let (set, dropped) = build_dataset(&games);
        assert_eq!(set.len(), 6);
        assert_eq!(dropped, 0);
        assert_eq!(set.features.len(), 6 * FEATURE_SIZE);
    }

    #[test]
    fn examples_encode_the_position_before_each_move() {
        let games = read_games(SHORT_GAME.as_bytes()).unwrap();
        let (set, _) = build_dataset(&games);

        // Replay by hand and compare every example against the board it
        // should have been taken from.
        let mut pos = Chess::default();
        for (i, san) in games[0].sans.iter().enumerate() {
            let expected = encode_board(pos.board());
            assert_eq!(&set.features[i * FEATURE_SIZE..(i + 1) * FEATURE_SIZE], &expected[..]);
            let m = san.san.to_move(&pos).unwrap();
            assert_eq!(u32::from(crate::move_to_index(&m)), set.labels[i]);
            pos.play_unchecked(&m);
        }
    }

    #[test]
    fn first_label_is_the_kings_pawn_push() {
        let games = read_games(SHORT_GAME.as_bytes()).unwrap();
        let (set, _) = build_dataset(&games);
        let (from, to) = index_to_squares(set.labels[0] as u16);
        assert_eq!((from, to), (Square::E2, Square::E4));
    }

    #[test]
    fn final_position_contributes_no_example() {
        // A game with a single move produces exactly one example.
        let games = read_games(&b"1. e4 *\n"[..]).unwrap();
        let (set, _) = build_dataset(&games);
        assert_eq!(set.len(), 1);
    }
}
