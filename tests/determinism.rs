use coach_engine::{Difficulty, Engine, EngineConfig};
use cozy_chess::Color;
use pretty_assertions::assert_eq;

const FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

#[test]
fn same_seed_same_move() {
    for d in Difficulty::ALL {
        let mut a = Engine::seeded(EngineConfig::default(), 1234);
        let mut b = Engine::seeded(EngineConfig::default(), 1234);
        assert_eq!(a.select_move(FEN, d).unwrap(), b.select_move(FEN, d).unwrap(), "{d}");
    }
}

#[test]
fn same_seed_same_hints() {
    let mut a = Engine::seeded(EngineConfig::default(), 77);
    let mut b = Engine::seeded(EngineConfig::default(), 77);
    for _ in 0..3 {
        let ha = a.analyze_suggestions(FEN, Color::White, 6).unwrap();
        let hb = b.analyze_suggestions(FEN, Color::White, 6).unwrap();
        assert_eq!(ha, hb);
    }
}

#[test]
fn expert_without_noise_is_reproducible_across_seeds() {
    // Expert has no mistakes and only a few centipawns of noise; the best
    // move score must match the exact search whatever the seed.
    let pos: coach_engine::Position = FEN.parse().unwrap();
    let engine = Engine::seeded(EngineConfig::default(), 0);
    let exact = engine.root_scores(&pos, Difficulty::Expert.profile().depth);
    let best = exact.iter().map(|s| s.score).max().unwrap();
    for seed in 0..3 {
        let mut e = Engine::seeded(EngineConfig { book_probability: 0.0, ..EngineConfig::default() }, seed);
        let mv = e.select_move_in(&pos, Difficulty::Expert).unwrap();
        let score = exact.iter().find(|s| s.mv == mv).unwrap().score;
        assert!(best - score <= 2 * Difficulty::Expert.profile().noise_cp, "seed {seed}: {mv} is {score} vs {best}");
    }
}
