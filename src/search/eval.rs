use cozy_chess::{Color, Piece, Square};

use crate::board::ChessRules;
use crate::config::EngineConfig;
use crate::search::pst;

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;
const KING: i32 = 20_000;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 100_000;
pub const DRAW_SCORE: i32 = 0;
/// Anything beyond this is a forced mate rather than a positional score.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => KING,
    }
}

fn phase_units(piece: Piece) -> i32 {
    match piece {
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::Pawn | Piece::King => 0,
    }
}

pub fn is_mate_score(score: i32) -> bool { score.abs() >= MATE_THRESHOLD }

/// Static evaluation in centipawns; positive favours White.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    pub mobility_weight: i32,
    pub endgame_material_threshold: i32,
}

impl Default for Evaluator {
    fn default() -> Self { Self::from_config(&EngineConfig::default()) }
}

impl Evaluator {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self { mobility_weight: cfg.mobility_weight, endgame_material_threshold: cfg.endgame_material_threshold }
    }

    pub fn evaluate<P: ChessRules>(&self, pos: &P) -> i32 {
        if pos.is_checkmate() {
            return match pos.side_to_move() {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            };
        }
        if pos.is_draw() { return DRAW_SCORE; }

        let pieces: Vec<(Square, Color, Piece)> = Square::ALL
            .into_iter()
            .filter_map(|sq| pos.piece_at(sq).map(|(c, p)| (sq, c, p)))
            .collect();
        let endgame = pieces.iter().map(|&(_, _, p)| phase_units(p)).sum::<i32>() <= self.endgame_material_threshold;

        let mut score = 0;
        for &(sq, color, piece) in &pieces {
            let material = if piece == Piece::King { 0 } else { piece_value(piece) };
            let v = material + pst::bonus(piece, color, sq, endgame);
            score += if color == Color::White { v } else { -v };
        }

        let mobility = self.mobility_weight * pos.legal_move_count() as i32;
        score + if pos.side_to_move() == Color::White { mobility } else { -mobility }
    }
}

/// Evaluation with default weights.
pub fn eval_cp<P: ChessRules>(pos: &P) -> i32 { Evaluator::default().evaluate(pos) }

/// Material only, positive means White has more.
pub fn material_eval_cp<P: ChessRules>(pos: &P) -> i32 {
    Square::ALL
        .into_iter()
        .filter_map(|sq| pos.piece_at(sq))
        .filter(|&(_, p)| p != Piece::King)
        .map(|(c, p)| if c == Color::White { piece_value(p) } else { -piece_value(p) })
        .sum()
}
