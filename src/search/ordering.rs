use cozy_chess::{Piece, Square};

use crate::board::ChessMove;
use crate::search::eval::piece_value;

const CAPTURE_BONUS: i32 = 10_000;
const PROMOTION_BONUS: i32 = 8_000;
const CENTER_BONUS: i32 = 50;

pub const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

fn attacker_value(piece: Piece) -> i32 {
    // a legal king capture never loses the king
    if piece == Piece::King { 0 } else { piece_value(piece) }
}

/// Cheap ordering key: MVV-LVA captures, then promotions, then central moves.
pub fn order_score(mv: &ChessMove) -> i32 {
    let mut s = 0;
    if let Some(victim) = mv.captured {
        s += CAPTURE_BONUS + piece_value(victim) - attacker_value(mv.piece);
    }
    if mv.promotion.is_some() { s += PROMOTION_BONUS; }
    if CENTER.contains(&mv.to) { s += CENTER_BONUS; }
    s
}

/// Sorts best-first. Stable, so equal keys keep generation order.
pub fn order_moves(moves: &mut [ChessMove]) {
    moves.sort_by_key(|m| -order_score(m));
}
