use std::sync::Arc;

use cozy_chess::Color;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{ChessMove, ChessRules, Position};
use crate::config::EngineConfig;
use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::hints::{self, HintParams, Suggestion};
use crate::openings::{self, OpeningBook};
use crate::search::alphabeta::{ScoredMove, Searcher};
use crate::search::eval::Evaluator;
use crate::search::noise;

/// Bot move selection and hint analysis behind one random source.
///
/// Every random decision (book choice, root noise, mistakes, hint jitter and
/// tie breaking) draws from the engine's own `SmallRng`, so two engines
/// built with the same seed and config give identical answers.
pub struct Engine {
    config: EngineConfig,
    evaluator: Evaluator,
    book: Arc<OpeningBook>,
    rng: SmallRng,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self { Self::with_rng(config, SmallRng::from_entropy()) }

    pub fn seeded(config: EngineConfig, seed: u64) -> Self { Self::with_rng(config, SmallRng::seed_from_u64(seed)) }

    pub fn with_rng(config: EngineConfig, rng: SmallRng) -> Self {
        Self::with_book(config, Arc::new(OpeningBook::standard::<Position>()), rng)
    }

    pub fn with_book(config: EngineConfig, book: Arc<OpeningBook>, rng: SmallRng) -> Self {
        Self { evaluator: Evaluator::from_config(&config), config, book, rng }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn book(&self) -> &OpeningBook { &self.book }

    /// Parses `fen` and picks the bot's move. `Ok(None)` means the game is
    /// already over (no legal moves).
    pub fn select_move(&mut self, fen: &str, difficulty: Difficulty) -> Result<Option<ChessMove>> {
        let pos = Position::from_fen(fen)?;
        Ok(self.select_move_in(&pos, difficulty))
    }

    pub fn select_move_in<P: ChessRules>(&mut self, pos: &P, difficulty: Difficulty) -> Option<ChessMove> {
        if pos.legal_move_count() == 0 { return None; }

        if let Some(candidates) = self.book.lookup(&pos.fen()) {
            if self.rng.gen_bool(self.config.book_probability) {
                if let Some(mv) = openings::choose(candidates, pos, &mut self.rng) { return Some(mv); }
            }
        }

        let profile = difficulty.profile();
        let mut searcher = Searcher::new(self.evaluator);
        let mut scored = searcher.root_scores(pos, profile.depth);
        noise::perturb(&mut scored, profile.noise_cp, &mut self.rng);
        let maximizing = pos.side_to_move() == Color::White;
        let chosen = noise::choose_with_mistakes(&mut scored, maximizing, &profile, &mut self.rng);
        debug!("{difficulty}: searched {} nodes at depth {}, chose {:?}", searcher.nodes(), profile.depth, chosen.map(|m| m.uci()));
        chosen.or_else(|| random_legal_move(pos, &mut self.rng))
    }

    /// Noise-free root scores at `depth`, White-positive.
    pub fn root_scores<P: ChessRules>(&self, pos: &P, depth: u32) -> Vec<ScoredMove> {
        Searcher::new(self.evaluator).root_scores(pos, depth)
    }

    pub fn evaluate<P: ChessRules>(&self, pos: &P) -> i32 { self.evaluator.evaluate(pos) }

    /// Parses `fen` and ranks up to `count` hints for `side`.
    pub fn analyze_suggestions(&mut self, fen: &str, side: Color, count: usize) -> Result<Vec<Suggestion>> {
        let pos = Position::from_fen(fen)?;
        Ok(self.analyze_suggestions_in(&pos, side, count))
    }

    pub fn analyze_suggestions_in<P: ChessRules>(&mut self, pos: &P, side: Color, count: usize) -> Vec<Suggestion> {
        let params = HintParams::from_config(&self.config);
        hints::analyze(pos, side, count, &params, &mut self.rng)
    }
}

/// Uniformly random legal move, `None` when the game is over. The host's
/// fallback when a search is late.
pub fn random_legal_move<P: ChessRules>(pos: &P, rng: &mut SmallRng) -> Option<ChessMove> {
    let legal = pos.legal_moves();
    if legal.is_empty() { None } else { Some(legal[rng.gen_range(0..legal.len())]) }
}
