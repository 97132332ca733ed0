use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::ChessMove;
use crate::difficulty::DifficultyProfile;
use crate::search::alphabeta::ScoredMove;
use crate::search::eval::is_mate_score;

/// Adds uniform noise in `[-magnitude, magnitude]` to every non-mate score.
pub fn perturb(scored: &mut [ScoredMove], magnitude: i32, rng: &mut SmallRng) {
    if magnitude <= 0 { return; }
    for s in scored.iter_mut() {
        if is_mate_score(s.score) { continue; }
        s.score += rng.gen_range(-magnitude..=magnitude);
    }
}

/// Sorts best-first for the mover: descending for White, ascending for Black.
pub fn sort_for_mover(scored: &mut [ScoredMove], maximizing: bool) {
    if maximizing {
        scored.sort_by_key(|s| -s.score);
    } else {
        scored.sort_by_key(|s| s.score);
    }
}

/// Picks the principal move, or with the tier's mistake probability a
/// uniform choice from the top-K. A mating move is never given up, and
/// moves that walk into a forced mate never enter the pool.
pub fn choose_with_mistakes(
    scored: &mut [ScoredMove],
    maximizing: bool,
    profile: &DifficultyProfile,
    rng: &mut SmallRng,
) -> Option<ChessMove> {
    if scored.is_empty() { return None; }
    sort_for_mover(scored, maximizing);
    let best = scored[0];
    let mover_sign = if maximizing { 1 } else { -1 };
    let mating = is_mate_score(best.score) && best.score * mover_sign > 0;
    if mating || profile.mistake_pool <= 1 || !rng.gen_bool(profile.mistake_probability) {
        return Some(best.mv);
    }
    let k = profile.mistake_pool.min(scored.len());
    let pool: Vec<&ScoredMove> = scored[..k]
        .iter()
        .filter(|s| !(is_mate_score(s.score) && s.score * mover_sign < 0))
        .collect();
    if pool.is_empty() { return Some(best.mv); }
    let pick = pool[rng.gen_range(0..pool.len())];
    Some(pick.mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ChessRules, Position};
    use crate::difficulty::Difficulty;
    use crate::search::eval::MATE_SCORE;
    use rand::SeedableRng;

    fn scored(pos: &Position, scores: &[i32]) -> Vec<ScoredMove> {
        pos.legal_moves().into_iter().zip(scores.iter()).map(|(mv, &score)| ScoredMove { mv, score }).collect()
    }

    #[test]
    fn never_trades_away_a_mate() {
        let pos = Position::startpos();
        let mut rng = SmallRng::seed_from_u64(7);
        let profile = Difficulty::Beginner.profile();
        for _ in 0..200 {
            let mut s = scored(&pos, &[10, MATE_SCORE, 30, 20, 0, -5]);
            let chosen = choose_with_mistakes(&mut s, true, &profile, &mut rng).unwrap();
            assert_eq!(chosen, pos.legal_moves()[1]);
        }
    }

    #[test]
    fn mistakes_stay_within_top_k() {
        let pos = Position::startpos();
        let all = pos.legal_moves();
        let mut rng = SmallRng::seed_from_u64(11);
        let profile = Difficulty::Easy.profile();
        let allowed: Vec<ChessMove> = vec![all[19], all[18], all[17], all[16]];
        let scores: Vec<i32> = (0..20).collect();
        for _ in 0..300 {
            let mut s = scored(&pos, &scores);
            let chosen = choose_with_mistakes(&mut s, true, &profile, &mut rng).unwrap();
            assert!(allowed.contains(&chosen), "picked {chosen} outside the top four");
        }
    }

    #[test]
    fn beginner_actually_makes_mistakes() {
        let pos = Position::startpos();
        let all = pos.legal_moves();
        let mut rng = SmallRng::seed_from_u64(13);
        let profile = Difficulty::Beginner.profile();
        let scores: Vec<i32> = (0..20).map(|i| i * 10).collect();
        let mut off_best = 0;
        for _ in 0..300 {
            let mut s = scored(&pos, &scores);
            let chosen = choose_with_mistakes(&mut s, true, &profile, &mut rng).unwrap();
            if chosen != all[19] { off_best += 1; }
        }
        // about 0.35 * 5/6 of the draws
        assert!(off_best > 30, "only {off_best} of 300 draws strayed from the best move");
        assert!(off_best < 200);
    }

    #[test]
    fn black_prefers_low_scores() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3P4/4K3 b - - 0 1").unwrap();
        let n = pos.legal_moves().len();
        let scores: Vec<i32> = (0..n as i32).map(|i| 100 - i * 10).collect();
        let mut s = scored(&pos, &scores);
        let mut rng = SmallRng::seed_from_u64(3);
        let chosen = choose_with_mistakes(&mut s, false, &Difficulty::Expert.profile(), &mut rng).unwrap();
        assert_eq!(chosen, pos.legal_moves()[n - 1]);
    }
}
