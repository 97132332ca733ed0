use cozy_chess::Color;
use log::{error, trace};

use crate::board::{ChessMove, ChessRules};
use crate::search::eval::{Evaluator, MATE_SCORE, MATE_THRESHOLD};
use crate::search::ordering::order_moves;

const INF: i32 = MATE_SCORE * 2;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    pub pruning: bool,
    pub order_moves: bool,
}

impl Default for SearchParams {
    fn default() -> Self { Self { depth: 2, pruning: true, order_moves: true } }
}

/// A root move with its minimax score (White-positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: ChessMove,
    pub score: i32,
}

#[derive(Default, Debug, Clone)]
pub struct SearchResult {
    pub bestmove: Option<ChessMove>,
    pub score_cp: i32,
    pub nodes: u64,
}

/// Fixed-depth minimax over cloned positions, with optional alpha-beta
/// pruning and move ordering.
pub struct Searcher {
    evaluator: Evaluator,
    pruning: bool,
    order_moves: bool,
    pub(crate) nodes: u64,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(Evaluator::default()) }
}

impl Searcher {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator, pruning: true, order_moves: true, nodes: 0 }
    }

    pub fn set_pruning(&mut self, on: bool) { self.pruning = on; }
    pub fn set_order_moves(&mut self, on: bool) { self.order_moves = on; }
    pub fn nodes(&self) -> u64 { self.nodes }

    /// Minimax score of `pos` searched `depth` plies deep. Mate scores are
    /// pushed further from zero by the remaining depth so quicker mates win.
    pub fn minimax<P: ChessRules>(&mut self, pos: &P, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes += 1;
        if depth == 0 || pos.is_game_over() { return self.leaf(pos, depth); }

        let mut moves = pos.legal_moves();
        if moves.is_empty() { return self.leaf(pos, depth); }
        if self.order_moves { order_moves(&mut moves); }

        let mut best = if maximizing { -INF } else { INF };
        for m in &moves {
            let child = match pos.child(m) {
                Ok(c) => c,
                Err(e) => { error!("search skipped a generated move: {e}"); continue; }
            };
            let score = self.minimax(&child, depth - 1, alpha, beta, !maximizing);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.pruning && beta <= alpha { break; }
        }
        if best.abs() == INF { self.leaf(pos, depth) } else { best }
    }

    fn leaf<P: ChessRules>(&self, pos: &P, depth: u32) -> i32 {
        let s = self.evaluator.evaluate(pos);
        if s >= MATE_THRESHOLD { s + depth as i32 } else if s <= -MATE_THRESHOLD { s - depth as i32 } else { s }
    }

    /// Exact score for every legal root move, each searched with a full
    /// window. A depth of 0 behaves like 1: children are evaluated directly.
    pub fn root_scores<P: ChessRules>(&mut self, pos: &P, depth: u32) -> Vec<ScoredMove> {
        let mut moves = pos.legal_moves();
        if self.order_moves { order_moves(&mut moves); }
        let maximizing = pos.side_to_move() == Color::White;
        let mut out = Vec::with_capacity(moves.len());
        for m in moves {
            let child = match pos.child(&m) {
                Ok(c) => c,
                Err(e) => { error!("root skipped a generated move: {e}"); continue; }
            };
            let score = self.minimax(&child, depth.saturating_sub(1), -INF, INF, !maximizing);
            out.push(ScoredMove { mv: m, score });
        }
        trace!("root scores at depth {depth}: {} moves, {} nodes", out.len(), self.nodes);
        out
    }

    /// Best move for the side to move, no noise.
    pub fn search_depth<P: ChessRules>(&mut self, pos: &P, depth: u32) -> SearchResult {
        self.nodes = 0;
        let maximizing = pos.side_to_move() == Color::White;
        let scored = self.root_scores(pos, depth);
        let best = if maximizing {
            scored.iter().max_by_key(|s| s.score)
        } else {
            scored.iter().min_by_key(|s| s.score)
        };
        match best {
            Some(b) => SearchResult { bestmove: Some(b.mv), score_cp: b.score, nodes: self.nodes },
            None => SearchResult { bestmove: None, score_cp: self.leaf(pos, 0), nodes: self.nodes },
        }
    }

    pub fn search_with_params<P: ChessRules>(&mut self, pos: &P, params: SearchParams) -> SearchResult {
        self.pruning = params.pruning;
        self.order_moves = params.order_moves;
        self.search_depth(pos, params.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn zero_depth_is_static_eval() {
        let pos = Position::startpos();
        let mut s = Searcher::default();
        assert_eq!(s.minimax(&pos, 0, -INF, INF, true), Evaluator::default().evaluate(&pos));
    }

    #[test]
    fn prefers_quicker_mate() {
        // Ra8 mates now; other rook moves can only mate later.
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut s = Searcher::default();
        let r = s.search_depth(&pos, 3);
        assert_eq!(r.bestmove.map(|m| m.uci()), Some("a1a8".to_string()));
        assert!(r.score_cp >= MATE_THRESHOLD);
    }
}
