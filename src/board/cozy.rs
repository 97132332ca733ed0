use std::str::FromStr;

use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, BitBoard,
    Board as CozyBoard, Color, File, Move, Piece, Square,
};

use super::{piece_char, ChessMove, ChessRules, MoveFlags};
use crate::error::{EngineError, Result};

/// `cozy-chess` backed position. Keeps the hashes seen since the last
/// irreversible move so threefold repetition can be detected.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<u64>,
}

impl Position {
    fn to_chess_move(&self, mv: Move, piece: Piece) -> ChessMove {
        let stm = self.board.side_to_move();
        let mut flags = MoveFlags::default();
        let mut to = mv.to;
        let mut captured = None;
        match self.board.color_on(mv.to) {
            // cozy-chess encodes castling as the king capturing its own rook
            Some(c) if c == stm && piece == Piece::King => {
                if (mv.to.file() as usize) > (mv.from.file() as usize) {
                    flags.castle_kingside = true;
                    to = Square::new(File::G, mv.from.rank());
                } else {
                    flags.castle_queenside = true;
                    to = Square::new(File::C, mv.from.rank());
                }
            }
            Some(_) => captured = self.board.piece_on(mv.to),
            None => {
                if piece == Piece::Pawn && mv.from.file() != mv.to.file() {
                    captured = Some(Piece::Pawn);
                    flags.en_passant = true;
                }
            }
        }
        if piece == Piece::Pawn && (mv.to.rank() as i32 - mv.from.rank() as i32).abs() == 2 {
            flags.double_push = true;
        }
        ChessMove { from: mv.from, to, piece, color: stm, captured, promotion: mv.promotion, flags }
    }

    fn backend_move(&self, mv: &ChessMove) -> Option<Move> {
        if !mv.is_castle() {
            return Some(Move { from: mv.from, to: mv.to, promotion: mv.promotion });
        }
        let stm = self.board.side_to_move();
        let mut found = None;
        self.board.generate_moves(|pm| {
            if pm.piece != Piece::King || pm.from != mv.from { return false; }
            for m in pm {
                if self.board.color_on(m.to) != Some(stm) { continue; }
                let kingside = (m.to.file() as usize) > (m.from.file() as usize);
                if kingside == mv.flags.castle_kingside { found = Some(m); break; }
            }
            found.is_some()
        });
        found
    }

    fn has_legal_move(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|pm| {
            if !pm.is_empty() { any = true; }
            any
        });
        any
    }

    fn repetitions(&self) -> usize {
        let current = self.board.hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    fn insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if (knights | bishops).len() <= 1 { return true; }
        if !knights.is_empty() { return false; }
        // bishops only: no mate is possible when they all share a square colour
        let light = bishops.into_iter().filter(|&sq| is_light(sq)).count();
        light == 0 || light == bishops.len() as usize
    }
}

fn is_light(sq: Square) -> bool { (sq.file() as usize + sq.rank() as usize) % 2 == 1 }

fn file_char(sq: Square) -> char { (b'a' + sq.file() as u8) as char }

fn rank_char(sq: Square) -> char { (b'1' + sq.rank() as u8) as char }

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> { Self::from_fen(s) }
}

impl ChessRules for Position {
    fn startpos() -> Self {
        let board = CozyBoard::default();
        let history = vec![board.hash()];
        Self { board, history }
    }

    fn from_fen(fen: &str) -> Result<Self> {
        let board = CozyBoard::from_fen(fen.trim(), false)
            .map_err(|e| EngineError::InvalidFen { fen: fen.to_string(), reason: format!("{e:?}") })?;
        let history = vec![board.hash()];
        Ok(Self { board, history })
    }

    fn fen(&self) -> String { format!("{}", self.board) }

    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((color, piece))
    }

    fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let b = &self.board;
        let occ = b.occupied();
        let them = b.colors(by);
        let queens = b.pieces(Piece::Queen);
        let mut attackers: BitBoard = get_knight_moves(sq) & b.pieces(Piece::Knight);
        attackers = attackers | (get_king_moves(sq) & b.pieces(Piece::King));
        attackers = attackers | (get_pawn_attacks(sq, !by) & b.pieces(Piece::Pawn));
        attackers = attackers | (get_bishop_moves(sq, occ) & (b.pieces(Piece::Bishop) | queens));
        attackers = attackers | (get_rook_moves(sq, occ) & (b.pieces(Piece::Rook) | queens));
        !(attackers & them).is_empty()
    }

    fn legal_moves(&self) -> Vec<ChessMove> {
        let mut out = Vec::with_capacity(48);
        self.board.generate_moves(|pm| {
            let piece = pm.piece;
            for m in pm { out.push(self.to_chess_move(m, piece)); }
            false
        });
        out
    }

    fn legal_move_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|pm| { ct += pm.len(); false });
        ct
    }

    fn play(&mut self, mv: &ChessMove) -> Result<()> {
        let raw = self
            .backend_move(mv)
            .filter(|&m| self.board.is_legal(m))
            .ok_or_else(|| EngineError::IllegalMove { mv: mv.uci(), fen: self.fen() })?;
        self.board.play_unchecked(raw);
        if self.board.halfmove_clock() == 0 { self.history.clear(); }
        self.history.push(self.board.hash());
        Ok(())
    }

    fn san(&self, mv: &ChessMove) -> String {
        let mut s = String::new();
        if mv.flags.castle_kingside {
            s.push_str("O-O");
        } else if mv.flags.castle_queenside {
            s.push_str("O-O-O");
        } else {
            if mv.piece == Piece::Pawn {
                if mv.is_capture() { s.push(file_char(mv.from)); }
            } else {
                s.push(piece_char(mv.piece).to_ascii_uppercase());
                let rivals: Vec<Square> = self
                    .legal_moves()
                    .into_iter()
                    .filter(|m| m.piece == mv.piece && m.to == mv.to && m.from != mv.from && !m.is_castle())
                    .map(|m| m.from)
                    .collect();
                if !rivals.is_empty() {
                    let shares_file = rivals.iter().any(|r| r.file() == mv.from.file());
                    let shares_rank = rivals.iter().any(|r| r.rank() == mv.from.rank());
                    if !shares_file {
                        s.push(file_char(mv.from));
                    } else if !shares_rank {
                        s.push(rank_char(mv.from));
                    } else {
                        s.push(file_char(mv.from));
                        s.push(rank_char(mv.from));
                    }
                }
            }
            if mv.is_capture() { s.push('x'); }
            s.push_str(&mv.to.to_string());
            if let Some(p) = mv.promotion {
                s.push('=');
                s.push(piece_char(p).to_ascii_uppercase());
            }
        }
        if let Ok(next) = self.child(mv) {
            if next.is_checkmate() { s.push('#'); } else if next.is_check() { s.push('+'); }
        }
        s
    }

    fn is_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn is_checkmate(&self) -> bool { self.is_check() && !self.has_legal_move() }

    fn is_stalemate(&self) -> bool { !self.is_check() && !self.has_legal_move() }

    fn is_draw(&self) -> bool {
        if self.is_stalemate() { return true; }
        if self.board.halfmove_clock() >= 100 { return !self.is_checkmate(); }
        self.repetitions() >= 3 || self.insufficient_material()
    }
}
