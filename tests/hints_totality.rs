use coach_engine::hints::{analyze, HintParams};
use coach_engine::{ChessRules, Engine, EngineConfig, Position};
use cozy_chess::Color;
use rand::rngs::SmallRng;
use rand::SeedableRng;

const FENS: [&str; 5] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 4 4",
    "4k3/4p3/8/8/8/8/4P3/4K3 w - - 0 1",
    "8/P6k/8/8/8/8/8/K7 w - - 0 1",
];

#[test]
fn suggestions_are_legal_and_bounded() {
    let mut rng = SmallRng::seed_from_u64(42);
    for fen in FENS {
        let pos = Position::from_fen(fen).unwrap();
        let legal = pos.legal_moves();
        let side = pos.side_to_move();
        for count in [1, 3, 7, 500] {
            let hints = analyze(&pos, side, count, &HintParams::default(), &mut rng);
            assert_eq!(hints.len(), count.min(legal.len()), "{fen} count {count}");
            for h in &hints {
                assert!(legal.contains(&h.mv), "{} is not legal in {fen}", h.mv);
                assert_eq!(h.san, pos.san(&h.mv));
            }
            let mut seen: Vec<String> = hints.iter().map(|h| h.mv.uci()).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), hints.len(), "duplicate suggestion in {fen}");
        }
    }
}

#[test]
fn only_the_top_suggestion_is_labelled_best() {
    let mut engine = Engine::seeded(EngineConfig::default(), 8);
    let pos = Position::startpos();
    let hints = engine.analyze_suggestions_in(&pos, Color::White, 8);
    assert_eq!(hints[0].label, "Best");
    assert!(hints[1..].iter().all(|h| h.label != "Best" && h.label == h.category.label()));
}

#[test]
fn promotion_is_suggested() {
    let pos = Position::from_fen(FENS[4]).unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    let hints = analyze(&pos, Color::White, 1, &HintParams::deterministic(), &mut rng);
    assert_eq!(hints[0].mv.uci(), "a7a8q");
}

#[test]
fn nothing_to_suggest_when_the_game_is_over() {
    let mut rng = SmallRng::seed_from_u64(0);
    for fen in ["R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1", "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"] {
        let pos = Position::from_fen(fen).unwrap();
        assert!(analyze(&pos, Color::Black, 5, &HintParams::default(), &mut rng).is_empty());
    }
    let pos = Position::startpos();
    assert!(analyze(&pos, Color::White, 0, &HintParams::default(), &mut rng).is_empty());
}

#[test]
fn wrong_side_is_rejected_quietly() {
    let mut engine = Engine::seeded(EngineConfig::default(), 2);
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    assert!(engine.analyze_suggestions(fen, Color::Black, 5).unwrap().is_empty());
}

#[test]
fn near_ties_come_back_in_different_orders() {
    let pos = Position::startpos();
    let mut orders: Vec<Vec<String>> = Vec::new();
    for seed in 0..30u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let top: Vec<String> = analyze(&pos, Color::White, 5, &HintParams::default(), &mut rng)
            .iter()
            .map(|h| h.mv.uci())
            .collect();
        if !orders.contains(&top) { orders.push(top); }
    }
    assert!(orders.len() >= 5, "only {} distinct orderings over 30 seeds", orders.len());
}
