//! Common opening lines in UCI notation, and the position-keyed book built
//! from their first few plies.

use std::collections::HashMap;

use cozy_chess::Square;
use log::{debug, error};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{ChessMove, ChessRules};

/// Book depth in plies; deeper positions are left to the search.
pub const BOOK_PLIES: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChessOpening {
    pub name: String,
    pub moves: Vec<String>,
}

fn line(name: &str, moves: &[&str]) -> ChessOpening {
    ChessOpening { name: name.to_string(), moves: moves.iter().map(|m| m.to_string()).collect() }
}

/// Get all chess openings
pub fn get_chess_openings() -> Vec<ChessOpening> {
    vec![
        line("Italian Game", &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5"]),
        line("Ruy Lopez", &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]),
        line("Scotch Game", &["e2e4", "e7e5", "g1f3", "b8c6", "d2d4", "e5d4"]),
        line("Vienna Game", &["e2e4", "e7e5", "b1c3", "g8f6"]),
        line("Sicilian Defense", &["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4"]),
        line("French Defense", &["e2e4", "e7e6", "d2d4", "d7d5"]),
        line("Caro-Kann Defense", &["e2e4", "c7c6", "d2d4", "d7d5"]),
        line("Queen's Gambit", &["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6"]),
        line("Slav Defense", &["d2d4", "d7d5", "c2c4", "c7c6"]),
        line("King's Indian Defense", &["d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7"]),
        line("Nimzo-Indian Defense", &["d2d4", "g8f6", "c2c4", "e7e6", "b1c3", "f8b4"]),
        line("London System", &["d2d4", "d7d5", "g1f3", "g8f6", "c1f4"]),
        line("English Opening", &["c2c4", "e7e5", "b1c3", "g8f6"]),
        line("Reti Opening", &["g1f3", "d7d5", "c2c4", "e7e6"]),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookMove {
    pub from: Square,
    pub to: Square,
}

/// Exact-match book: serialized position -> candidate moves. Keys are
/// produced by the same serializer the lookup uses, by replaying the lines
/// from the initial position.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<String, Vec<BookMove>>,
}

impl OpeningBook {
    pub fn standard<P: ChessRules>() -> Self { Self::from_openings::<P>(&get_chess_openings(), BOOK_PLIES) }

    pub fn from_openings<P: ChessRules>(openings: &[ChessOpening], plies: usize) -> Self {
        let mut book = Self::default();
        for opening in openings {
            let mut pos = P::startpos();
            for uci in opening.moves.iter().take(plies) {
                let Some(mv) = pos.find_uci(uci) else {
                    error!("opening '{}' has illegal move {uci}; line truncated", opening.name);
                    break;
                };
                book.insert(pos.fen(), BookMove { from: mv.from, to: mv.to });
                if let Err(e) = pos.play(&mv) {
                    error!("opening '{}' failed to replay: {e}", opening.name);
                    break;
                }
            }
        }
        book
    }

    fn insert(&mut self, fen: String, mv: BookMove) {
        let moves = self.entries.entry(fen).or_default();
        if !moves.contains(&mv) { moves.push(mv); }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn lookup(&self, fen: &str) -> Option<&[BookMove]> { self.entries.get(fen).map(|v| v.as_slice()) }
}

/// Uniformly random pick among `candidates` that are legal in `pos`.
pub fn choose<P: ChessRules>(candidates: &[BookMove], pos: &P, rng: &mut SmallRng) -> Option<ChessMove> {
    let legal = pos.legal_moves();
    let playable: Vec<ChessMove> = candidates
        .iter()
        .filter_map(|b| legal.iter().find(|m| m.from == b.from && m.to == b.to).copied())
        .collect();
    if playable.is_empty() { return None; }
    let mv = playable[rng.gen_range(0..playable.len())];
    debug!("book move {mv} from {} candidates", playable.len());
    Some(mv)
}
