//! One-ply move hints for the human player.
//!
//! Unlike the bot search this never looks past the opponent's immediate
//! reply. Every legal move is played once, tagged with the categories it
//! fits, and scored from flat bonuses. Each bonus carries jitter and the
//! whole call shares a fresh variety seed, so near-equal moves come back in
//! a different order from call to call while clear winners stay on top.

use cozy_chess::{Color, Piece, Rank, Square};
use log::{debug, error};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{ChessMove, ChessRules};
use crate::config::EngineConfig;
use crate::search::eval::piece_value;
use crate::search::ordering::CENTER;

pub const BEST_LABEL: &str = "Best";

const CHECKMATE_SCORE: i32 = 100_000;
const CHECK_BONUS: i32 = 60;
const FREE_CAPTURE_BONUS: i32 = 50;
const GOOD_TRADE_BONUS: i32 = 20;
const EVEN_TRADE_BONUS: i32 = 10;
const CASTLE_BONUS: i32 = 70;
const CENTER_BONUS: i32 = 30;
const DEVELOPMENT_BONUS: i32 = 35;
const ATTACK_BONUS: i32 = 15;
const SAFE_BONUS: i32 = 5;
/// Ranks 2..SHUFFLE_SPAN may be reshuffled; rank 1 only moves on a tie.
const SHUFFLE_SPAN: usize = 4;

const KNIGHT_DEVELOPMENT: [Square; 4] = [Square::C3, Square::F3, Square::D2, Square::E2];
const BISHOP_DEVELOPMENT: [Square; 8] =
    [Square::B5, Square::C4, Square::D3, Square::E2, Square::D2, Square::E3, Square::F4, Square::G5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintCategory {
    Checkmate,
    Check,
    FreeCapture,
    GoodTrade,
    EvenTrade,
    BadTrade,
    Castle,
    CenterControl,
    Development,
    Attack,
    Safe,
    Quiet,
}

impl HintCategory {
    pub fn label(self) -> &'static str {
        match self {
            HintCategory::Checkmate => "Checkmate",
            HintCategory::Check => "Check",
            HintCategory::FreeCapture => "Free capture",
            HintCategory::GoodTrade => "Good trade",
            HintCategory::EvenTrade => "Even trade",
            HintCategory::BadTrade => "Bad trade",
            HintCategory::Castle => "Castle",
            HintCategory::CenterControl => "Center control",
            HintCategory::Development => "Development",
            HintCategory::Attack => "Attack",
            HintCategory::Safe => "Safe",
            HintCategory::Quiet => "Quiet",
        }
    }
}

/// A ranked hint. `category` is what the move does; `label` is the text
/// shown to the player, which is [`BEST_LABEL`] for the first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub mv: ChessMove,
    pub san: String,
    pub score: i32,
    pub category: HintCategory,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HintParams {
    pub jitter: i32,
    pub variety: i32,
    pub tie_delta: i32,
    pub shuffle_probability: f64,
}

impl HintParams {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            jitter: cfg.hint_jitter,
            variety: cfg.hint_variety,
            tie_delta: cfg.hint_tie_delta,
            shuffle_probability: cfg.hint_shuffle_probability,
        }
    }

    /// No randomness at all; handy for tests that compare raw scores.
    pub fn deterministic() -> Self { Self { jitter: 0, variety: 0, tie_delta: 0, shuffle_probability: 0.0 } }
}

impl Default for HintParams {
    fn default() -> Self { Self::from_config(&EngineConfig::default()) }
}

struct Candidate {
    mv: ChessMove,
    score: i32,
    category: HintCategory,
}

fn jittered(base: i32, jitter: i32, rng: &mut SmallRng) -> i32 {
    if jitter <= 0 { base } else { base + rng.gen_range(0..=jitter) }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn variety_offset(seed: u64, mv: &ChessMove, variety: i32) -> i32 {
    if variety <= 0 { return 0; }
    let key = ((mv.from as u64) << 6) | mv.to as u64;
    let span = (2 * variety + 1) as u64;
    (splitmix64(seed ^ key) % span) as i32 - variety
}

fn is_development(mv: &ChessMove) -> bool {
    let (home, to) = match mv.color {
        Color::White => (Rank::First, mv.to),
        Color::Black => (Rank::Eighth, mv.to.flip_rank()),
    };
    if mv.from.rank() != home { return false; }
    match mv.piece {
        Piece::Knight => KNIGHT_DEVELOPMENT.contains(&to),
        Piece::Bishop => BISHOP_DEVELOPMENT.contains(&to),
        _ => false,
    }
}

/// Value of the most valuable enemy piece that the mover attacks after the
/// move but did not attack before it. Scales the bonus for moving onto a
/// square the mover did not control.
fn new_attack_value<P: ChessRules>(before: &P, after: &P, mover: Color) -> Option<i32> {
    Square::ALL
        .into_iter()
        .filter_map(|sq| match after.piece_at(sq) {
            Some((c, p)) if c != mover && p != Piece::King => Some((sq, p)),
            _ => None,
        })
        .filter(|&(sq, _)| after.is_attacked(sq, mover) && !before.is_attacked(sq, mover))
        .map(|(_, p)| piece_value(p))
        .max()
}

fn score_move<P: ChessRules>(pos: &P, mv: &ChessMove, params: &HintParams, rng: &mut SmallRng) -> Option<(i32, HintCategory)> {
    let child = match pos.child(mv) {
        Ok(c) => c,
        Err(e) => { error!("hint analysis skipped a generated move: {e}"); return None; }
    };
    if child.is_checkmate() {
        return Some((jittered(CHECKMATE_SCORE, params.jitter, rng), HintCategory::Checkmate));
    }

    let mover = mv.color;
    let j = params.jitter;
    let recapturable = child.legal_moves().iter().any(|r| r.to == mv.to);
    let mut tags: Vec<(HintCategory, i32)> = Vec::new();
    let mut score = 0;

    if let Some(victim) = mv.captured {
        let gain = piece_value(victim);
        if !recapturable {
            tags.push((HintCategory::FreeCapture, jittered(gain + FREE_CAPTURE_BONUS, j, rng)));
        } else {
            let diff = gain - piece_value(mv.piece);
            let tag = match diff {
                d if d > 0 => (HintCategory::GoodTrade, jittered(d + GOOD_TRADE_BONUS, j, rng)),
                0 => (HintCategory::EvenTrade, jittered(EVEN_TRADE_BONUS, j, rng)),
                d => (HintCategory::BadTrade, jittered(d, j, rng)),
            };
            tags.push(tag);
        }
    } else if recapturable && !child.is_attacked(mv.to, mover) {
        // the moved piece hangs
        score -= piece_value(mv.piece) / 2;
    }
    if let Some(p) = mv.promotion { score += piece_value(p) - piece_value(Piece::Pawn); }
    if child.is_check() { tags.push((HintCategory::Check, jittered(CHECK_BONUS, j, rng))); }
    if mv.is_castle() { tags.push((HintCategory::Castle, jittered(CASTLE_BONUS, j, rng))); }
    if CENTER.contains(&mv.to) { tags.push((HintCategory::CenterControl, jittered(CENTER_BONUS, j, rng))); }
    if is_development(mv) { tags.push((HintCategory::Development, jittered(DEVELOPMENT_BONUS, j, rng))); }
    if !pos.is_attacked(mv.to, mover) {
        let extra = new_attack_value(pos, &child, mover).map_or(0, |v| v / 10);
        tags.push((HintCategory::Attack, jittered(ATTACK_BONUS + extra, j, rng)));
    }
    if !recapturable { score += jittered(SAFE_BONUS, j, rng); }

    score += tags.iter().map(|&(_, b)| b).sum::<i32>();
    let category = tags
        .iter()
        .max_by_key(|&&(_, b)| b.abs())
        .map(|&(c, _)| c)
        .unwrap_or(if recapturable { HintCategory::Quiet } else { HintCategory::Safe });
    Some((score, category))
}

fn break_ties(cands: &mut [Candidate], params: &HintParams, rng: &mut SmallRng) {
    let mut start = 0;
    while start < cands.len() {
        let mut end = start + 1;
        while end < cands.len() && cands[start].score - cands[end].score <= params.tie_delta { end += 1; }
        if end - start > 1 { cands[start..end].shuffle(rng); }
        start = end;
    }
    if cands.len() > 2 && rng.gen_bool(params.shuffle_probability) {
        let span = SHUFFLE_SPAN.min(cands.len());
        cands[1..span].shuffle(rng);
    }
}

/// Top `count` labeled suggestions for `side`. Empty when `side` is not to
/// move or has no legal moves.
pub fn analyze<P: ChessRules>(pos: &P, side: Color, count: usize, params: &HintParams, rng: &mut SmallRng) -> Vec<Suggestion> {
    if count == 0 { return Vec::new(); }
    if side != pos.side_to_move() {
        debug!("hints requested for {side:?} but {:?} is to move", pos.side_to_move());
        return Vec::new();
    }
    let moves = pos.legal_moves();
    if moves.is_empty() { return Vec::new(); }

    let variety_seed: u64 = rng.gen();
    let mut cands: Vec<Candidate> = Vec::with_capacity(moves.len());
    for mv in moves {
        let Some((score, category)) = score_move(pos, &mv, params, rng) else { continue };
        let score = score + variety_offset(variety_seed, &mv, params.variety);
        cands.push(Candidate { mv, score, category });
    }
    cands.sort_by_key(|c| -c.score);
    break_ties(&mut cands, params, rng);

    cands
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, c)| Suggestion {
            san: pos.san(&c.mv),
            label: if i == 0 { BEST_LABEL.to_string() } else { c.category.label().to_string() },
            mv: c.mv,
            score: c.score,
            category: c.category,
        })
        .collect()
}
