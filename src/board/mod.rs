//! Rules-engine seam. The engine never implements chess rules itself; it talks
//! to a backend through [`ChessRules`]. [`cozy::Position`] is the default backend.

pub mod cozy;

use std::fmt;

pub use cozy_chess::{Color, File, Piece, Rank, Square};

use crate::error::Result;

pub use cozy::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags {
    pub castle_kingside: bool,
    pub castle_queenside: bool,
    pub en_passant: bool,
    pub double_push: bool,
}

/// A legal move as produced by a rules backend. For castling `to` is the
/// king's destination square (g1/c1/g8/c8), not the rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub color: Color,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub flags: MoveFlags,
}

impl ChessMove {
    pub fn is_capture(&self) -> bool { self.captured.is_some() }

    pub fn is_castle(&self) -> bool { self.flags.castle_kingside || self.flags.castle_queenside }

    /// Long algebraic (UCI) form, e.g. `e2e4`, `e7e8q`, `e1g1`.
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, piece_char(p)),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.uci()) }
}

pub fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

/// Capability set the engine needs from a chess rules backend.
///
/// Positions are treated as values: search and analysis clone a position and
/// [`play`](ChessRules::play) on the clone, so a caller's position is never
/// mutated by the engine.
pub trait ChessRules: Clone + Send + 'static {
    fn startpos() -> Self;
    /// Fails with [`EngineError::InvalidFen`](crate::error::EngineError::InvalidFen) on malformed input.
    fn from_fen(fen: &str) -> Result<Self>;
    fn fen(&self) -> String;

    fn side_to_move(&self) -> Color;
    fn piece_at(&self, sq: Square) -> Option<(Color, Piece)>;
    /// True if any piece of `by` attacks `sq`, ignoring pins.
    fn is_attacked(&self, sq: Square, by: Color) -> bool;

    fn legal_moves(&self) -> Vec<ChessMove>;
    fn legal_move_count(&self) -> usize;
    fn play(&mut self, mv: &ChessMove) -> Result<()>;
    /// Standard algebraic notation for a legal move of this position.
    fn san(&self, mv: &ChessMove) -> String;

    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    /// Stalemate, fifty-move rule, threefold repetition or insufficient material.
    fn is_draw(&self) -> bool;

    fn is_game_over(&self) -> bool { self.is_checkmate() || self.is_draw() }

    fn find_uci(&self, uci: &str) -> Option<ChessMove> {
        self.legal_moves().into_iter().find(|m| m.uci() == uci)
    }

    fn child(&self, mv: &ChessMove) -> Result<Self> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }
}
